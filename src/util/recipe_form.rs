//! Recipe form wiring: multipart submit, image preview, delete, clear-all.
//!
//! SYSTEM CONTEXT
//! ==============
//! `#recipe-form` is posted by script rather than by the browser: the form
//! data gains the fields from `state::recipe_form::submit_fields`, goes to
//! the editor's own path, and the page follows the server's redirect. Steps,
//! tags and nutrition are already in the form as hidden inputs rendered by
//! their components.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, FormData, HtmlElement, HtmlFormElement, HtmlInputElement, SubmitEvent};

use super::dialog;
use super::dom::listen;
use crate::config::parse_positive_id;
use crate::error::ApiError;
use crate::net::api;
use crate::state::recipe_form::{
    DELETE_RECIPE_CONFIRM_MESSAGE, DELETE_RECIPE_FAILED_MESSAGE, HOME_PATH, SUBMIT_FAILED_MESSAGE,
    SubmitKind, submit_fields,
};

const FORM_ID: &str = "recipe-form";
const IMAGE_INPUT_ID: &str = "imageFile";
const IMAGE_PREVIEW_ID: &str = "img-container";
const LINK_INPUT_ID: &str = "recipe-link";
const DELETE_BUTTON_ID: &str = "delete-button";
const CLEAR_ALL_ID: &str = "clear-all";
const IMAGE_FIELD: &str = "imageFile";

fn input_by_id(doc: &Document, id: &str) -> Option<HtmlInputElement> {
    doc.get_element_by_id(id)?.dyn_into::<HtmlInputElement>().ok()
}

fn build_form_data(doc: &Document, form: &HtmlFormElement, kind: SubmitKind) -> Result<FormData, JsValue> {
    let data = FormData::new_with_form(form)?;
    let image = input_by_id(doc, IMAGE_INPUT_ID)
        .and_then(|input| input.files())
        .and_then(|files| files.get(0));
    match &image {
        Some(file) => data.set_with_blob_and_filename(IMAGE_FIELD, file, &file.name())?,
        // An empty file input still contributes an empty part.
        None => data.delete(IMAGE_FIELD),
    }
    let link = input_by_id(doc, LINK_INPUT_ID).map(|input| input.value());
    let image_src = doc
        .get_element_by_id(IMAGE_PREVIEW_ID)
        .and_then(|img| img.get_attribute("src"));
    for (name, value) in submit_fields(kind, link.as_deref(), image.is_some(), image_src.as_deref()) {
        data.set_with_str(name, &value)?;
    }
    Ok(data)
}

fn install_image_preview(doc: &Document) {
    let Some(input) = input_by_id(doc, IMAGE_INPUT_ID) else {
        return;
    };
    let preview_doc = doc.clone();
    let source = input.clone();
    let mut current: Option<String> = None;
    listen(&input, "change", move |_| {
        let Some(file) = source.files().and_then(|files| files.get(0)) else {
            return;
        };
        let Some(img) = preview_doc
            .get_element_by_id(IMAGE_PREVIEW_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        match web_sys::Url::create_object_url_with_blob(&file) {
            Ok(url) => {
                let _ = img.set_attribute("src", &url);
                let _ = img.style().remove_property("display");
                if let Some(old) = current.replace(url) {
                    let _ = web_sys::Url::revoke_object_url(&old);
                }
            }
            Err(e) => leptos::logging::warn!("recipe image preview failed: {e:?}"),
        }
    });
}

fn install_submit(doc: &Document, form: &HtmlFormElement, login_path: String) {
    let busy = Rc::new(Cell::new(false));
    let submit_doc = doc.clone();
    let submit_form = form.clone();
    listen(form, "submit", move |event| {
        event.prevent_default();
        if busy.get() {
            return;
        }
        let submitter = event
            .dyn_ref::<SubmitEvent>()
            .and_then(SubmitEvent::submitter)
            .map(|el| el.id());
        let kind = SubmitKind::from_submitter(submitter.as_deref());
        let data = match build_form_data(&submit_doc, &submit_form, kind) {
            Ok(data) => data,
            Err(e) => {
                leptos::logging::warn!("recipe form data not built: {e:?}");
                dialog::alert(SUBMIT_FAILED_MESSAGE);
                return;
            }
        };
        let path = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default();
        busy.set(true);
        let busy = Rc::clone(&busy);
        let login_path = login_path.clone();
        leptos::task::spawn_local(async move {
            match api::submit_recipe(&path, data).await {
                Ok(next) => dialog::navigate(&next),
                Err(ApiError::Unauthorized) => dialog::navigate(&login_path),
                Err(e) => {
                    leptos::logging::warn!("recipe submit failed: {e}");
                    dialog::alert(&e.user_message(SUBMIT_FAILED_MESSAGE));
                }
            }
            busy.set(false);
        });
    });
}

fn install_delete(doc: &Document) {
    let Some(button) = doc.get_element_by_id(DELETE_BUTTON_ID) else {
        return;
    };
    let source = button.clone();
    listen(&button, "click", move |event| {
        event.prevent_default();
        let Some(recipe_id) = source.get_attribute("value").as_deref().and_then(parse_positive_id) else {
            leptos::logging::warn!("delete button has no recipe id");
            return;
        };
        if !dialog::confirm(DELETE_RECIPE_CONFIRM_MESSAGE) {
            return;
        }
        leptos::task::spawn_local(async move {
            match api::delete_recipe(recipe_id).await {
                Ok(next) => dialog::navigate(&next),
                Err(e) => {
                    leptos::logging::warn!("recipe {recipe_id} delete failed: {e}");
                    dialog::alert(&e.user_message(DELETE_RECIPE_FAILED_MESSAGE));
                }
            }
        });
    });
}

/// Wire the recipe editor when `#recipe-form` is on the page.
pub fn install_recipe_form(login_path: &str) {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(form) = doc
        .get_element_by_id(FORM_ID)
        .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
    else {
        return;
    };
    install_image_preview(&doc);
    install_submit(&doc, &form, login_path.to_owned());
    install_delete(&doc);
    if let Some(clear) = doc.get_element_by_id(CLEAR_ALL_ID) {
        listen(&clear, "click", |event| {
            event.prevent_default();
            dialog::navigate(HOME_PATH);
        });
    }
    leptos::logging::log!("recipe form installed");
}
