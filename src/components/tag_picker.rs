//! Tag toggles for the recipe form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted into `#tag-container` inside `#recipe-form`. The server renders
//! one element per tag (its `id` is the tag name, `tag-select` marks a
//! selected one); `mount` reads those before replacing them with this
//! component. Selected tags are submitted as repeated `tags` inputs.

use leptos::prelude::*;

use crate::state::recipe_form::{TagOption, TagSelection};

/// Host element id.
pub const HOST_ID: &str = "tag-container";

/// Clickable tag chips plus their hidden form values.
#[component]
pub fn TagPicker(tags: Vec<TagOption>) -> impl IntoView {
    let selection = RwSignal::new(TagSelection::new(tags));

    let items = selection
        .with_untracked(|s| s.tags().to_vec())
        .into_iter()
        .map(|tag| {
            let dom_id = tag.id.clone();
            let shown_id = tag.id.clone();
            let pressed_id = tag.id.clone();
            let toggle_id = tag.id;
            let toggle = move || {
                selection.update(|s| {
                    s.toggle(&toggle_id);
                });
            };
            let toggle_key = toggle.clone();
            view! {
                <span
                    id=dom_id
                    class="tag"
                    role="button"
                    tabindex="0"
                    class:tag-select=move || selection.with(|s| s.is_selected(&shown_id))
                    aria-pressed=move || selection.with(|s| s.is_selected(&pressed_id)).to_string()
                    on:click=move |_| toggle()
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" || ev.key() == " " {
                            ev.prevent_default();
                            toggle_key();
                        }
                    }
                >
                    {tag.label}
                </span>
            }
        })
        .collect_view();

    view! {
        {items}
        {move || {
            selection
                .with(TagSelection::form_values)
                .into_iter()
                .map(|id| view! { <input type="hidden" name="tags" value=id /> })
                .collect_view()
        }}
    }
}
