use std::cell::{Cell, RefCell};
use std::future::ready;
use std::rc::Rc;

use futures::executor::block_on;

use super::*;
use crate::sync::channel::StorageRelay;
use crate::sync::testing::{FakePage, Origin, RecordingChannel, TabStore, TaskQueue};

fn clock() -> f64 {
    1_700_000_000_000.0
}

type Engine = SaveSync<TabStore, RecordingChannel, FakePage>;

fn engine_on(origin: &Rc<Origin>) -> (Engine, FakePage, RecordingChannel) {
    let page = FakePage::default();
    let channel = RecordingChannel::default();
    let engine = SaveSync::new(
        origin.open_tab(),
        channel.clone(),
        page.clone(),
        ClientConfig::default(),
        clock,
    );
    (engine, page, channel)
}

fn cached(origin: &Origin, id: u32) -> Option<bool> {
    origin
        .raw(&format!("save-state-{id}"))
        .and_then(|raw| crate::sync::cache::decode_state(&raw))
        .map(|s| s.saved)
}

// =============================================================
// initialize
// =============================================================

#[test]
fn cached_state_wins_over_markup() {
    let origin = Origin::new();
    origin.open_tab().seed("save-state-42", r#"{"saved":true,"t":1}"#);
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(42), false);

    engine.initialize(&page.all());

    assert_eq!(chip.shown(), Some(ChipState::Saved));
    assert_eq!(chip.label(), Some("Saved"));
}

#[test]
fn markup_is_used_without_cache() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let saved = page.add(Some(1), true);
    let unsaved = page.add(Some(2), false);

    assert_eq!(engine.initialize(&page.all()), 2);

    assert_eq!(saved.shown(), Some(ChipState::Saved));
    assert_eq!(unsaved.shown(), Some(ChipState::Unsaved));
}

#[test]
fn malformed_cache_falls_back_to_markup() {
    let origin = Origin::new();
    origin.open_tab().seed("save-state-3", "{{");
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(3), true);

    engine.initialize(&page.all());

    assert_eq!(chip.shown(), Some(ChipState::Saved));
}

#[test]
fn reinitializing_a_subtree_leaves_pending_chips_alone() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(5), false);
    engine.initialize(&page.all());
    engine.begin_toggle(&chip).unwrap();

    let inserted = page.add(Some(5), false);
    engine.initialize(&vec![inserted.clone(), chip.clone()]);

    assert!(chip.disabled());
    assert_eq!(inserted.shown(), Some(ChipState::Unsaved));
}

// =============================================================
// handle_toggle
// =============================================================

#[test]
fn end_to_end_save_converges_page_and_cache() {
    let origin = Origin::new();
    let (engine, page, channel) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    let sibling = page.add(Some(42), false);
    let other = page.add(Some(7), false);
    engine.initialize(&page.all());

    let calls = Cell::new(0);
    let outcome = block_on(engine.handle_toggle(&chip, |id, intended| {
        calls.set(calls.get() + 1);
        assert_eq!(id, 42);
        assert!(intended);
        ready(Ok(Some(true)))
    }));

    assert_eq!(outcome, ToggleOutcome::Applied { recipe_id: 42, saved: true });
    assert_eq!(calls.get(), 1);
    assert_eq!(chip.label(), Some("Saved"));
    assert_eq!(sibling.label(), Some("Saved"));
    assert!(!chip.disabled());
    assert_eq!(other.shown(), Some(ChipState::Unsaved));
    assert_eq!(cached(&origin, 42), Some(true));

    let sent = channel.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!((sent[0].id, sent[0].saved, sent[0].v), (42, true, 1));
}

#[test]
fn toggled_chip_is_painted_once_on_success_while_siblings_follow() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    let sibling = page.add(Some(42), false);
    engine.initialize(&page.all());
    let before = (chip.renders(), sibling.renders());

    block_on(engine.handle_toggle(&chip, |_, _| ready(Ok(Some(true)))));

    // One paint for pending, one for the confirmed value.
    assert_eq!(chip.renders(), before.0 + 2);
    assert_eq!(sibling.renders(), before.1 + 1);
    assert_eq!(sibling.shown(), Some(ChipState::Saved));

    assert!(engine.on_page_event(r#"{"id":42,"saved":true,"t":1,"v":1}"#));
    assert_eq!(chip.shown(), Some(ChipState::Saved));
    assert_eq!(sibling.shown(), Some(ChipState::Saved));
}

#[test]
fn missing_saved_field_falls_back_to_intent() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(8), true);
    engine.initialize(&page.all());

    let outcome = block_on(engine.handle_toggle(&chip, |_, _| ready(Ok(None))));

    assert_eq!(outcome, ToggleOutcome::Applied { recipe_id: 8, saved: false });
    assert_eq!(chip.shown(), Some(ChipState::Unsaved));
}

#[test]
fn server_value_overrides_intent() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(8), false);
    engine.initialize(&page.all());

    block_on(engine.handle_toggle(&chip, |_, _| ready(Ok(Some(false)))));

    assert_eq!(chip.shown(), Some(ChipState::Unsaved));
    assert_eq!(cached(&origin, 8), Some(false));
}

#[test]
fn unauthorized_redirects_without_side_effects() {
    let origin = Origin::new();
    let (engine, page, channel) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    engine.initialize(&page.all());

    let outcome = block_on(engine.handle_toggle(&chip, |_, _| ready(Err(ApiError::Unauthorized))));

    assert_eq!(outcome, ToggleOutcome::Redirect("/login".to_owned()));
    assert_eq!(cached(&origin, 42), None);
    assert!(channel.sent.borrow().is_empty());
    assert_eq!(chip.shown(), Some(ChipState::Unsaved));
}

#[test]
fn rejection_rolls_back_and_surfaces_message() {
    let origin = Origin::new();
    let (engine, page, channel) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    engine.initialize(&page.all());

    let outcome = block_on(engine.handle_toggle(&chip, |_, _| {
        ready(Err(ApiError::Rejected("Recipe not found".to_owned())))
    }));

    assert_eq!(outcome, ToggleOutcome::Failed("Recipe not found".to_owned()));
    assert_eq!(chip.shown(), Some(ChipState::Unsaved));
    assert!(!chip.disabled());
    assert!(channel.sent.borrow().is_empty());
    assert_eq!(cached(&origin, 42), None);
}

#[test]
fn transport_failure_uses_generic_message() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(42), true);
    engine.initialize(&page.all());

    let outcome = block_on(engine.handle_toggle(&chip, |_, _| {
        ready(Err(ApiError::Transport("connection reset".to_owned())))
    }));

    assert_eq!(outcome, ToggleOutcome::Failed("Could not update save.".to_owned()));
    assert_eq!(chip.shown(), Some(ChipState::Saved));
}

#[test]
fn in_flight_chip_rejects_second_activation() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    engine.initialize(&page.all());

    let ticket = engine.begin_toggle(&chip).unwrap();
    assert!(chip.disabled());
    assert!(engine.begin_toggle(&chip).is_none());

    engine.finish_toggle(&chip, ticket, Ok(Some(true)));
    assert!(!chip.disabled());
    assert!(engine.begin_toggle(&chip).is_some());
}

#[test]
fn chip_without_id_is_ignored() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(None, false);
    engine.initialize(&page.all());

    let called = Cell::new(false);
    let outcome = block_on(engine.handle_toggle(&chip, |_, _| {
        called.set(true);
        ready(Ok(Some(true)))
    }));

    assert_eq!(outcome, ToggleOutcome::Ignored);
    assert!(!called.get());
}

#[test]
fn cache_write_failure_still_converges() {
    let origin = Origin::new();
    origin.fail_writes.set(true);
    let (engine, page, channel) = engine_on(&origin);
    let chip = page.add(Some(3), false);
    let sibling = page.add(Some(3), false);
    engine.initialize(&page.all());

    let outcome = block_on(engine.handle_toggle(&chip, |_, _| ready(Ok(Some(true)))));

    assert_eq!(outcome, ToggleOutcome::Applied { recipe_id: 3, saved: true });
    assert_eq!(sibling.shown(), Some(ChipState::Saved));
    assert_eq!(channel.sent.borrow().len(), 1);
}

// =============================================================
// external changes
// =============================================================

#[test]
fn external_change_converges_all_bound_chips() {
    let origin = Origin::new();
    let (engine, page, channel) = engine_on(&origin);
    let chips: Vec<_> = (0..3).map(|i| page.add(Some(11), i % 2 == 0)).collect();
    engine.initialize(&page.all());

    assert_eq!(engine.apply_external(11, true), 3);

    assert!(chips.iter().all(|c| c.shown() == Some(ChipState::Saved)));
    assert!(channel.sent.borrow().is_empty());
}

#[test]
fn repeated_page_event_is_idempotent() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    engine.initialize(&page.all());
    let detail = SaveBroadcast::new(42, true, 0.0).encode();

    assert!(engine.on_page_event(&detail));
    let after_first = chip.shown();
    assert!(engine.on_page_event(&detail));

    assert_eq!(chip.shown(), after_first);
    assert_eq!(chip.shown(), Some(ChipState::Saved));
}

#[test]
fn malformed_events_are_dropped() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    engine.initialize(&page.all());

    assert!(!engine.on_page_event("{}"));
    assert!(!engine.on_storage_event(Some("recipe-save-sync"), Some("nope")));
    assert!(!engine.on_storage_event(Some("save-state-42"), Some(r#"{"saved":true}"#)));
    assert_eq!(chip.shown(), Some(ChipState::Unsaved));
}

#[test]
fn external_change_during_request_updates_rollback_target() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let chip = page.add(Some(42), false);
    engine.initialize(&page.all());

    let ticket = engine.begin_toggle(&chip).unwrap();
    engine.apply_external(42, true);
    assert!(chip.disabled());

    engine.finish_toggle(&chip, ticket, Err(ApiError::Transport("x".to_owned())));
    assert_eq!(chip.shown(), Some(ChipState::Saved));
}

#[test]
fn pageshow_reapplies_cached_state_over_stale_markup() {
    let origin = Origin::new();
    let (engine, page, _) = engine_on(&origin);
    let stale = page.add(Some(42), false);
    let untouched = page.add(Some(9), true);
    engine.initialize(&page.all());

    origin.open_tab().seed("save-state-42", r#"{"saved":true,"t":2}"#);
    assert_eq!(engine.reapply_cached(), 1);

    assert_eq!(stale.shown(), Some(ChipState::Saved));
    assert_eq!(untouched.shown(), Some(ChipState::Saved));
}

// =============================================================
// cross-tab
// =============================================================

/// In-page fan-out is recorded; cross-tab goes through the storage relay.
struct TabChannel {
    page: RecordingChannel,
    relay: StorageRelay<TabStore>,
}

impl SaveChannel for TabChannel {
    fn publish(&self, message: &SaveBroadcast) {
        self.page.publish(message);
        self.relay.signal(message);
    }
}

type TabEngine = SaveSync<TabStore, TabChannel, FakePage>;

fn open_tab(origin: &Rc<Origin>, queue: &TaskQueue) -> (Rc<TabEngine>, FakePage, Rc<RefCell<usize>>) {
    let store = origin.open_tab();
    let page = FakePage::default();
    let channel = TabChannel {
        page: RecordingChannel::default(),
        relay: StorageRelay::new(store.clone(), "recipe-save-sync", queue.defer()),
    };
    let engine = Rc::new(SaveSync::new(
        store.clone(),
        channel,
        page.clone(),
        ClientConfig::default(),
        clock,
    ));
    let received = Rc::new(RefCell::new(0));
    let listener_engine = Rc::clone(&engine);
    let counter = Rc::clone(&received);
    store.on_storage(move |key, value| {
        if listener_engine.on_storage_event(Some(key), value) {
            *counter.borrow_mut() += 1;
        }
    });
    (engine, page, received)
}

#[test]
fn toggle_reaches_sibling_tab_without_self_relay() {
    let origin = Origin::new();
    let queue = TaskQueue::default();
    let (tab_a, page_a, received_a) = open_tab(&origin, &queue);
    let (tab_b, page_b, received_b) = open_tab(&origin, &queue);
    let chip_a = page_a.add(Some(42), false);
    let chip_b = page_b.add(Some(42), false);
    tab_a.initialize(&page_a.all());
    tab_b.initialize(&page_b.all());

    block_on(tab_a.handle_toggle(&chip_a, |_, _| ready(Ok(Some(true)))));
    queue.run_all();

    assert_eq!(chip_b.shown(), Some(ChipState::Saved));
    assert_eq!(*received_b.borrow(), 1);
    assert_eq!(*received_a.borrow(), 0);
    assert!(origin.raw("recipe-save-sync").is_none());
}

#[test]
fn repeated_identical_toggles_each_reach_sibling() {
    let origin = Origin::new();
    let queue = TaskQueue::default();
    let (tab_a, _page_a, _) = open_tab(&origin, &queue);
    let (tab_b, page_b, received_b) = open_tab(&origin, &queue);
    let chip_b = page_b.add(Some(42), false);
    tab_b.initialize(&page_b.all());

    tab_a.broadcast(42, true);
    queue.run_all();
    tab_a.broadcast(42, true);
    queue.run_all();

    assert_eq!(*received_b.borrow(), 2);
    assert_eq!(chip_b.shown(), Some(ChipState::Saved));
}
