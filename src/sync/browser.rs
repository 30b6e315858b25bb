//! `web-sys` bindings for the save sync engine.
//!
//! SYSTEM CONTEXT
//! ==============
//! One engine per page, held in a thread-local. [`install`] wires the
//! document-level listeners exactly once; [`init_save_chips`] is the
//! registration contract for markup inserted after load (exported to JS as
//! `initSaveChips`). Chips never need their own listeners since activation
//! is delegated from the document.
//!
//! Chip markup:
//! - `.save-chip` on cards or `#saveBtn` on the recipe page, with
//!   `data-recipe-id` (`data-id` is a deprecated alias).
//! - optional `data-saved="true"`, `aria-pressed="true"` or `is-saved`.
//! - optional `.label` child whose text becomes `Saved` / `Save`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, CustomEventInit, Element, HtmlElement, StorageEvent};

use super::channel::{SaveBroadcast, SaveChannel, StorageRelay};
use super::engine::{ChipHandle, ChipSurface, SaveSync, ToggleOutcome};
use crate::config::{ClientConfig, parse_positive_id};
use crate::net::api;
use crate::state::save::{CHIP_SELECTOR, ChipState, chip_selector_for, markup_saved};
use crate::util::storage::LocalStore;
use crate::util::dom::{listen, listen_with_capture};
use crate::util::{cards, dialog};

const DETAIL_BUTTON_SELECTOR: &str = "#saveBtn";
const STATE_ATTR: &str = "data-save-state";

fn document() -> Option<web_sys::Document> {
    web_sys::window().and_then(|w| w.document())
}

fn collect_chips(list: Result<web_sys::NodeList, JsValue>) -> Vec<DomChip> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .map(DomChip)
        .collect()
}

/// A save chip element.
#[derive(Clone, Debug)]
pub struct DomChip(pub HtmlElement);

impl DomChip {
    /// Force `type="button"` so a chip inside a form never submits it.
    fn coerce_button_type(&self) {
        let is_button = self.0.tag_name().eq_ignore_ascii_case("button");
        if is_button && self.0.get_attribute("type").as_deref() != Some("button") {
            let _ = self.0.set_attribute("type", "button");
        }
    }
}

impl ChipHandle for DomChip {
    fn recipe_id(&self) -> Option<u32> {
        self.0
            .get_attribute("data-recipe-id")
            .or_else(|| self.0.get_attribute("data-id"))
            .as_deref()
            .and_then(parse_positive_id)
    }

    fn state(&self) -> Option<ChipState> {
        self.0
            .get_attribute(STATE_ATTR)
            .as_deref()
            .and_then(ChipState::from_attr)
    }

    fn markup_saved(&self) -> bool {
        markup_saved(
            self.0.get_attribute("data-saved").as_deref(),
            self.0.get_attribute("aria-pressed").as_deref(),
            self.0.class_list().contains("is-saved"),
        )
    }

    fn render(&self, state: ChipState) {
        let el = &self.0;
        let paint = state.paint();
        let _ = el.set_attribute(STATE_ATTR, paint.state_attr);
        let _ = el.class_list().toggle_with_force("is-saved", paint.saved);
        let _ = el.set_attribute("aria-pressed", paint.aria_pressed);
        let _ = el.set_attribute("aria-label", paint.label);
        if paint.busy {
            let _ = el.set_attribute("disabled", "");
            let _ = el.set_attribute("aria-busy", "true");
        } else {
            let _ = el.remove_attribute("disabled");
            let _ = el.remove_attribute("aria-busy");
        }
        if let Ok(Some(label)) = el.query_selector(".label") {
            label.set_text_content(Some(paint.label));
        }
    }

    fn same_control(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// The live document as a chip surface.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomSurface;

impl ChipSurface for DomSurface {
    type Root = Element;
    type Chip = DomChip;

    fn chips_in(&self, root: &Element) -> Vec<DomChip> {
        let mut chips = Vec::new();
        if root.matches(CHIP_SELECTOR).unwrap_or(false) {
            if let Ok(el) = root.clone().dyn_into::<HtmlElement>() {
                chips.push(DomChip(el));
            }
        }
        chips.extend(collect_chips(root.query_selector_all(CHIP_SELECTOR)));
        chips
    }

    fn chips_for(&self, recipe_id: u32) -> Vec<DomChip> {
        let Some(doc) = document() else {
            return Vec::new();
        };
        collect_chips(doc.query_selector_all(&chip_selector_for(recipe_id)))
    }

    fn all_chips(&self) -> Vec<DomChip> {
        let Some(doc) = document() else {
            return Vec::new();
        };
        collect_chips(doc.query_selector_all(CHIP_SELECTOR))
    }
}

/// In-page custom event plus the cross-tab storage relay.
pub struct BrowserChannel {
    event_name: String,
    relay: StorageRelay<LocalStore>,
}

impl BrowserChannel {
    pub fn new(config: &ClientConfig) -> Self {
        let defer: super::channel::Defer = Box::new(|task| {
            gloo_timers::callback::Timeout::new(0, task).forget();
        });
        Self {
            event_name: config.event_name.clone(),
            relay: StorageRelay::new(LocalStore, config.channel_key.clone(), defer),
        }
    }

    fn dispatch_page_event(&self, message: &SaveBroadcast) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let detail = js_sys::JSON::parse(&message.encode()).unwrap_or(JsValue::NULL);
        let init = CustomEventInit::new();
        init.set_detail(&detail);
        match CustomEvent::new_with_event_init_dict(&self.event_name, &init) {
            Ok(event) => {
                let _ = window.dispatch_event(&event);
            }
            Err(e) => leptos::logging::warn!("{} event not created: {e:?}", self.event_name),
        }
    }
}

impl SaveChannel for BrowserChannel {
    fn publish(&self, message: &SaveBroadcast) {
        self.dispatch_page_event(message);
        self.relay.signal(message);
    }
}

/// The engine as wired to the browser.
pub type BrowserSync = SaveSync<LocalStore, BrowserChannel, DomSurface>;

thread_local! {
    static ENGINE: RefCell<Option<Rc<BrowserSync>>> = const { RefCell::new(None) };
}

fn engine() -> Option<Rc<BrowserSync>> {
    ENGINE.with(|slot| slot.borrow().clone())
}

/// Create the page's engine and wire its listeners. Later calls return the
/// existing engine untouched.
pub fn install(config: ClientConfig) -> Option<Rc<BrowserSync>> {
    if let Some(existing) = engine() {
        return Some(existing);
    }
    let window = web_sys::window()?;
    let doc = window.document()?;
    let channel = BrowserChannel::new(&config);
    let sync = Rc::new(SaveSync::new(
        LocalStore,
        channel,
        DomSurface,
        config.clone(),
        js_sys::Date::now,
    ));
    ENGINE.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&sync)));

    let on_click = Rc::clone(&sync);
    listen(&doc, "click", move |event| {
        let chip = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(CHIP_SELECTOR).ok().flatten())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let Some(chip) = chip else {
            return;
        };
        event.prevent_default();
        event.stop_immediate_propagation();
        event.stop_propagation();
        leptos::task::spawn_local(run_toggle(Rc::clone(&on_click), DomChip(chip)));
    });

    // The detail-page button swallows pointerdown before page scripts see it.
    listen_with_capture(&doc, "pointerdown", true, |event| {
        let on_button = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(DETAIL_BUTTON_SELECTOR).ok().flatten())
            .is_some();
        if on_button {
            event.prevent_default();
            event.stop_immediate_propagation();
            event.stop_propagation();
        }
    });

    let on_storage = Rc::clone(&sync);
    listen(&window, "storage", move |event| {
        let Some(event) = event.dyn_ref::<StorageEvent>() else {
            return;
        };
        on_storage.on_storage_event(event.key().as_deref(), event.new_value().as_deref());
    });

    let on_page = Rc::clone(&sync);
    listen(&window, &config.event_name, move |event| {
        let Some(event) = event.dyn_ref::<CustomEvent>() else {
            return;
        };
        let detail = js_sys::JSON::stringify(&event.detail())
            .ok()
            .and_then(|s| s.as_string());
        if let Some(detail) = detail {
            on_page.on_page_event(&detail);
        }
    });

    let on_show = Rc::clone(&sync);
    listen(&window, "pageshow", move |_| {
        on_show.reapply_cached();
    });

    leptos::logging::log!("save sync installed");
    Some(sync)
}

async fn run_toggle(sync: Rc<BrowserSync>, chip: DomChip) {
    let outcome = sync.handle_toggle(&chip, api::toggle_save).await;
    match outcome {
        ToggleOutcome::Applied { saved: false, .. } => cards::remove_unsaved_card(&chip.0),
        ToggleOutcome::Redirect(url) => dialog::navigate(&url),
        ToggleOutcome::Failed(message) => dialog::alert(&message),
        ToggleOutcome::Applied { .. } | ToggleOutcome::Ignored => {}
    }
}

/// Initialize every chip under `root` and return how many were painted.
///
/// Safe to call repeatedly on the same subtree. Does nothing before
/// [`install`].
#[wasm_bindgen(js_name = initSaveChips)]
pub fn init_save_chips(root: &Element) -> usize {
    let Some(sync) = engine() else {
        leptos::logging::warn!("initSaveChips called before save sync was installed");
        return 0;
    };
    for chip in sync.surface().chips_in(root) {
        chip.coerce_button_type();
    }
    sync.initialize(root)
}
