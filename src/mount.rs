//! WASM entry point: wire page-wide behavior and mount components.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend renders full pages and includes this module's bundle on every
//! one of them. `start` runs once per page load; each feature activates only
//! when its host markup is present, so the same bundle serves the feed, the
//! recipe page, the editor and the profile page.

#[cfg(test)]
#[path = "mount_test.rs"]
mod mount_test;

use crate::config::parse_positive_id;

/// Parse a host's JSON string array (`data-ingredients`). Missing or bad
/// data yields no entries; blank lines are dropped.
#[must_use]
pub fn parse_string_list(raw: Option<&str>) -> Vec<String> {
    raw.and_then(|r| serde_json::from_str::<Vec<String>>(r).ok())
        .unwrap_or_default()
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Recipe id from a host's `data-recipe-id`.
#[must_use]
pub fn host_recipe_id(raw: Option<&str>) -> Option<u32> {
    raw.and_then(parse_positive_id)
}

#[cfg(feature = "csr")]
mod browser {
    use leptos::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlElement};

    use super::{host_recipe_id, parse_string_list};
    use crate::components::comment_thread::{self, CommentThread};
    use crate::components::nutrition_panel::{self, NutritionPanel};
    use crate::components::profile_editor::{self, ProfileEditor};
    use crate::components::rating_widget::{self, RatingWidget};
    use crate::components::step_editor::{self, StepEditor};
    use crate::components::tag_picker::{self, TagPicker};
    use crate::config::{ClientConfig, Viewer};
    use crate::state::rating::RatingState;
    use crate::state::recipe_form::TagOption;

    /// Empty a host and return it ready for mounting.
    fn take_host(doc: &Document, id: &str) -> Option<HtmlElement> {
        let host = doc.get_element_by_id(id)?.dyn_into::<HtmlElement>().ok()?;
        host.set_inner_html("");
        Some(host)
    }

    pub(super) fn mount_rating(doc: &Document, config: &ClientConfig) {
        let Some(el) = doc.get_element_by_id(rating_widget::HOST_ID) else {
            return;
        };
        let Some(recipe_id) = host_recipe_id(el.get_attribute("data-recipe-id").as_deref()) else {
            leptos::logging::warn!("rating widget has no recipe id");
            return;
        };
        let initial = RatingState::from_attributes(
            el.get_attribute("data-current").as_deref(),
            el.get_attribute("data-locked").as_deref(),
            el.get_attribute("data-avg").as_deref(),
            el.get_attribute("data-count").as_deref(),
        );
        let Some(host) = take_host(doc, rating_widget::HOST_ID) else {
            return;
        };
        let login_path = config.login_path.clone();
        leptos::mount::mount_to(host, move || {
            view! { <RatingWidget recipe_id initial login_path /> }
        })
        .forget();
    }

    pub(super) fn mount_comments(doc: &Document, viewer: Viewer) {
        let Some(el) = doc.get_element_by_id(comment_thread::HOST_ID) else {
            return;
        };
        let Some(recipe_id) = host_recipe_id(el.get_attribute("data-recipe-id").as_deref()) else {
            leptos::logging::warn!("comment thread has no recipe id");
            return;
        };
        let initial = doc
            .get_element_by_id(comment_thread::DATA_ID)
            .and_then(|script| script.text_content())
            .map(|raw| comment_thread::parse_initial(&raw))
            .unwrap_or_default();
        let Some(host) = take_host(doc, comment_thread::HOST_ID) else {
            return;
        };
        leptos::mount::mount_to(host, move || {
            view! { <CommentThread recipe_id initial viewer /> }
        })
        .forget();
    }

    pub(super) fn mount_nutrition(doc: &Document) {
        let Some(el) = doc.get_element_by_id(nutrition_panel::HOST_ID) else {
            return;
        };
        let initial = parse_string_list(el.get_attribute("data-ingredients").as_deref());
        let servings = el.get_attribute("data-servings").unwrap_or_else(|| "1".to_owned());
        let Some(host) = take_host(doc, nutrition_panel::HOST_ID) else {
            return;
        };
        leptos::mount::mount_to(host, move || {
            view! { <NutritionPanel initial servings /> }
        })
        .forget();
    }

    pub(super) fn mount_steps(doc: &Document) {
        let Some(el) = doc.get_element_by_id(step_editor::HOST_ID) else {
            return;
        };
        let initial = parse_string_list(el.get_attribute("data-steps").as_deref());
        let Some(host) = take_host(doc, step_editor::HOST_ID) else {
            return;
        };
        leptos::mount::mount_to(host, move || {
            view! { <StepEditor initial /> }
        })
        .forget();
    }

    /// Tags come from the server-rendered children of `#tag-container`.
    pub(super) fn mount_tags(doc: &Document) {
        let Some(el) = doc.get_element_by_id(tag_picker::HOST_ID) else {
            return;
        };
        let children = el.children();
        let tags: Vec<TagOption> = (0..children.length())
            .filter_map(|i| children.item(i))
            .filter_map(|child| {
                TagOption::from_markup(
                    &child.id(),
                    child.text_content().as_deref(),
                    child.get_attribute("class").as_deref(),
                )
            })
            .collect();
        let Some(host) = take_host(doc, tag_picker::HOST_ID) else {
            return;
        };
        leptos::mount::mount_to(host, move || {
            view! { <TagPicker tags /> }
        })
        .forget();
    }

    pub(super) fn mount_profile(doc: &Document, config: &ClientConfig) {
        let Some(host) = take_host(doc, profile_editor::HOST_ID) else {
            return;
        };
        let login_path = config.login_path.clone();
        leptos::mount::mount_to(host, move || {
            view! { <ProfileEditor login_path /> }
        })
        .forget();
    }
}

/// Page start-up: logging, save sync, card links, then components.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        leptos::logging::warn!("console logger not installed: {e}");
    }

    let (config, viewer) = crate::config::from_document();
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    if crate::sync::browser::install(config.clone()).is_some() {
        if let Some(body) = doc.body() {
            let painted = crate::sync::browser::init_save_chips(&body);
            leptos::logging::log!("save chips initialized: {painted}");
        }
    }
    crate::util::cards::install_card_links();
    crate::util::tabs::install_tabs();

    browser::mount_rating(&doc, &config);
    browser::mount_comments(&doc, viewer);
    browser::mount_nutrition(&doc);
    browser::mount_steps(&doc);
    browser::mount_tags(&doc);
    crate::util::recipe_form::install_recipe_form(&config.login_path);
    browser::mount_profile(&doc, &config);
}
