//! Small DOM writes for server-rendered elements outside mounted components,
//! plus page-lifetime event listeners.

/// Replace the text of the element with `id`, if present.
pub fn set_text_by_id(id: &str, text: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (id, text);
    }
}

/// Set an attribute on the element with `id`, if present.
pub fn set_attr_by_id(id: &str, name: &str, value: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let _ = el.set_attribute(name, value);
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (id, name, value);
    }
}

/// Add a bubbling listener that lives as long as the page.
#[cfg(feature = "csr")]
pub fn listen(
    target: &web_sys::EventTarget,
    name: &str,
    handler: impl FnMut(web_sys::Event) + 'static,
) {
    listen_with_capture(target, name, false, handler);
}

/// Add a listener for the capture or bubble phase that lives as long as
/// the page. Failures are logged and otherwise ignored.
#[cfg(feature = "csr")]
pub fn listen_with_capture(
    target: &web_sys::EventTarget,
    name: &str,
    capture: bool,
    handler: impl FnMut(web_sys::Event) + 'static,
) {
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::Closure;

    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    let installed = target.add_event_listener_with_callback_and_bool(
        name,
        closure.as_ref().unchecked_ref(),
        capture,
    );
    if let Err(e) = installed {
        leptos::logging::warn!("{name} listener not installed: {e:?}");
    }
    closure.forget();
}
