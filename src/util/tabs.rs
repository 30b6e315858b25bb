//! Profile page tabs (`.tab-btn[data-tab]` switching `.tab-pane#id`).
//!
//! The saved-tab card removal in `cards` keys off the active pane, so tab
//! state lives in the `active` class and nowhere else.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{Element, Event};

fn set_active(doc: &web_sys::Document, selector: &str, active: Option<&Element>) {
    let Ok(list) = doc.query_selector_all(selector) else {
        return;
    };
    for el in (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
    {
        let on = active.is_some_and(|a| a == &el);
        let _ = el.class_list().toggle_with_force("active", on);
    }
}

/// Activate the clicked tab button and its pane.
pub fn install_tabs() {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let handler_doc = doc.clone();
    let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let button = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(".tab-btn").ok().flatten());
        let Some(button) = button else {
            return;
        };
        let Some(pane_id) = button.get_attribute("data-tab") else {
            return;
        };
        let pane = handler_doc.get_element_by_id(&pane_id);
        set_active(&handler_doc, ".tab-btn", Some(&button));
        set_active(&handler_doc, ".tab-pane", pane.as_ref());
    });
    if let Err(e) = doc.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()) {
        leptos::logging::warn!("tabs not installed: {e:?}");
    }
    on_click.forget();
}
