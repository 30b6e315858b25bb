//! Instruction steps for the recipe form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted into `#stepEditor` inside `#recipe-form`, seeded from the host's
//! `data-steps` JSON array. Submitted values are mirrored into hidden
//! `steps` inputs; the visible textareas stay editable but carry no name.

use leptos::prelude::*;

use crate::state::recipe_form::StepList;

/// Host element id.
pub const HOST_ID: &str = "stepEditor";

/// Step entry box with Add/Clear and the editable step list.
#[component]
pub fn StepEditor(initial: Vec<String>) -> impl IntoView {
    let steps = RwSignal::new(StepList::new(initial));
    let draft = RwSignal::new(String::new());

    let on_add = move |_| {
        let text = draft.get_untracked();
        if steps.try_update(|s| s.add(&text)).flatten().is_some() {
            draft.set(String::new());
        }
    };

    view! {
        <div class="step-editor">
            <textarea
                id="step-edit"
                rows="3"
                placeholder="Describe the next step"
                prop:value=move || draft.get()
                on:input=move |ev| draft.set(event_target_value(&ev))
            ></textarea>
            <div class="step-actions">
                <button id="step-add" type="button" class="pure-button" on:click=on_add>
                    "Add Step"
                </button>
                <button
                    id="step-clear"
                    type="button"
                    class="pure-button-secondary"
                    on:click=move |_| draft.set(String::new())
                >
                    "Clear"
                </button>
            </div>
            <ol id="step-zone">
                <For
                    each=move || steps.with(StepList::keys)
                    key=|key| *key
                    children=move |key| step_item(steps, key)
                />
            </ol>
            {move || {
                steps
                    .with(StepList::form_values)
                    .into_iter()
                    .map(|text| view! { <input type="hidden" name="steps" value=text /> })
                    .collect_view()
            }}
        </div>
    }
}

fn step_item(steps: RwSignal<StepList>, key: u32) -> impl IntoView {
    let text = steps.with_untracked(|s| s.text(key).unwrap_or_default().to_owned());
    view! {
        <li class="step-list">
            <textarea
                rows="2"
                prop:value=text
                on:input=move |ev| {
                    let text = event_target_value(&ev);
                    steps.update(|s| {
                        s.edit(key, &text);
                    });
                }
            ></textarea>
            <button
                type="button"
                class="pure-button-secondary"
                on:click=move |_| {
                    steps.update(|s| {
                        s.remove(key);
                    });
                }
            >
                "Remove"
            </button>
        </li>
    }
}
