//! Recipe card behavior: whole-card links and saved-tab pruning.
//!
//! DESIGN
//! ======
//! Card navigation is delegated from the document, so cards inserted after
//! load behave the same as server-rendered ones. Clicks inside a save chip,
//! a button or a link never navigate.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{Element, Event};

use super::dialog;

const CARD_SELECTOR: &str = ".recipe-card";
const INTERACTIVE_SELECTOR: &str = ".save-chip, button, a";
/// Shown when the last card of the saved tab is removed.
pub const EMPTY_SAVED_MESSAGE: &str = "You don't have any saved posts";

fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Navigate to a card's `data-url` when the card itself is clicked.
pub fn install_card_links() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let Some(target) = event_element(&event) else {
            return;
        };
        if target.closest(INTERACTIVE_SELECTOR).ok().flatten().is_some() {
            return;
        }
        let Some(card) = target.closest(CARD_SELECTOR).ok().flatten() else {
            return;
        };
        if let Some(url) = card.get_attribute("data-url").filter(|u| !u.is_empty()) {
            dialog::navigate(&url);
        }
    });
    if let Err(e) =
        document.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
    {
        leptos::logging::warn!("card links not installed: {e:?}");
    }
    on_click.forget();
}

/// After an unsave on the profile's active saved tab, drop the chip's card.
///
/// When the grid empties, it is replaced by [`EMPTY_SAVED_MESSAGE`].
pub fn remove_unsaved_card(chip: &Element) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(pane) = document.get_element_by_id("saved") else {
        return;
    };
    if !pane.class_list().contains("active") || !pane.contains(Some(chip.as_ref())) {
        return;
    }
    let Some(card) = chip.closest(CARD_SELECTOR).ok().flatten() else {
        return;
    };
    let grid = card.parent_element();
    card.remove();

    let Some(grid) = grid else {
        return;
    };
    if grid.query_selector(CARD_SELECTOR).ok().flatten().is_some() {
        return;
    }
    let Some(container) = grid.parent_element() else {
        return;
    };
    if let Ok(message) = document.create_element("p") {
        message.set_text_content(Some(EMPTY_SAVED_MESSAGE));
        container.replace_children_with_node_1(&message);
    }
}
