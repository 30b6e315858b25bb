use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::sync::testing::{Origin, TaskQueue};

// =============================================================
// Payload codec
// =============================================================

#[test]
fn encode_carries_version() {
    let raw = SaveBroadcast::new(42, true, 5.0).encode();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["v"], 1);
    assert_eq!(value["id"], 42);
    assert_eq!(value["saved"], true);
}

#[test]
fn decode_accepts_legacy_payload_without_version() {
    let msg = SaveBroadcast::decode(r#"{"id":42,"saved":true,"t":1700000000000}"#).unwrap();
    assert_eq!(msg.v, 0);
    assert_eq!(msg.id, 42);
    assert!(msg.saved);
}

#[test]
fn decode_ignores_unknown_fields_and_newer_versions() {
    let msg = SaveBroadcast::decode(r#"{"v":3,"id":9,"saved":false,"origin":"tab-2"}"#).unwrap();
    assert_eq!(msg.id, 9);
    assert!(!msg.saved);
}

#[test]
fn decode_drops_malformed_payloads() {
    assert!(SaveBroadcast::decode("garbage").is_none());
    assert!(SaveBroadcast::decode(r#"{"id":0,"saved":true}"#).is_none());
    assert!(SaveBroadcast::decode(r#"{"id":-1,"saved":true}"#).is_none());
    assert!(SaveBroadcast::decode(r#"{"id":3,"saved":"true"}"#).is_none());
    assert!(SaveBroadcast::decode(r#"{"saved":true}"#).is_none());
}

#[test]
fn decode_signal_filters_key_and_removals() {
    let raw = SaveBroadcast::new(4, true, 0.0).encode();
    assert!(decode_signal("recipe-save-sync", Some("recipe-save-sync"), Some(&raw)).is_some());
    assert!(decode_signal("recipe-save-sync", Some("other"), Some(&raw)).is_none());
    assert!(decode_signal("recipe-save-sync", Some("recipe-save-sync"), None).is_none());
    assert!(decode_signal("recipe-save-sync", Some("recipe-save-sync"), Some("")).is_none());
    assert!(decode_signal("recipe-save-sync", None, Some(&raw)).is_none());
}

// =============================================================
// Storage relay
// =============================================================

fn collect_signals(tab: &crate::sync::testing::TabStore) -> Rc<RefCell<Vec<SaveBroadcast>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    tab.on_storage(move |key, value| {
        if let Some(msg) = decode_signal("recipe-save-sync", Some(key), value) {
            sink.borrow_mut().push(msg);
        }
    });
    seen
}

#[test]
fn signal_reaches_sibling_tab_but_not_writer() {
    let origin = Origin::new();
    let writer = origin.open_tab();
    let sibling = origin.open_tab();
    let queue = TaskQueue::default();
    let relay = StorageRelay::new(writer.clone(), "recipe-save-sync", queue.defer());

    let writer_seen = collect_signals(&writer);
    let sibling_seen = collect_signals(&sibling);

    relay.signal(&SaveBroadcast::new(42, true, 1.0));

    assert_eq!(sibling_seen.borrow().len(), 1);
    assert!(writer_seen.borrow().is_empty());
}

#[test]
fn key_is_removed_on_next_turn() {
    let origin = Origin::new();
    let queue = TaskQueue::default();
    let relay = StorageRelay::new(origin.open_tab(), "recipe-save-sync", queue.defer());

    relay.signal(&SaveBroadcast::new(42, true, 1.0));
    assert!(origin.raw("recipe-save-sync").is_some());
    assert_eq!(queue.len(), 1);

    queue.run_all();
    assert!(origin.raw("recipe-save-sync").is_none());
}

#[test]
fn identical_broadcasts_each_fire_once() {
    let origin = Origin::new();
    let writer = origin.open_tab();
    let sibling = origin.open_tab();
    let queue = TaskQueue::default();
    let relay = StorageRelay::new(writer, "recipe-save-sync", queue.defer());
    let seen = collect_signals(&sibling);

    let msg = SaveBroadcast::new(42, true, 1.0);
    relay.signal(&msg);
    queue.run_all();
    relay.signal(&msg);
    queue.run_all();

    assert_eq!(seen.borrow().len(), 2);
    assert!(seen.borrow().iter().all(|m| m.id == 42 && m.saved));
}

#[test]
fn failed_write_schedules_nothing() {
    let origin = Origin::new();
    origin.fail_writes.set(true);
    let queue = TaskQueue::default();
    let relay = StorageRelay::new(origin.open_tab(), "recipe-save-sync", queue.defer());

    relay.signal(&SaveBroadcast::new(1, true, 0.0));
    assert_eq!(queue.len(), 0);
    assert_eq!(relay.key(), "recipe-save-sync");
}
