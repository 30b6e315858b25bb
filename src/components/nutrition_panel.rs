//! Ingredient list with a live nutrition estimate for the recipe form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted into `#nutritionEstimator` inside the recipe form. The host
//! carries the existing ingredient lines (`data-ingredients`, a JSON string
//! array) and servings (`data-servings`). The component renders hidden
//! `ingredients` and `nutrients` inputs, so the form data built on submit
//! (see `util::recipe_form`) carries the estimate as-is.

use leptos::prelude::*;

use crate::net::api;
use crate::state::nutrition::{
    LOOKUP_FAILED_MESSAGE, LOOKUP_PENDING_MESSAGE, Lookup, NUTRIENT_COUNT, NUTRIENT_NAMES,
    NutritionState,
};

/// Host element id.
pub const HOST_ID: &str = "nutritionEstimator";

/// Lookup phase as far as the row markup cares. Grams and the selected
/// candidate are excluded: editing them must not rebuild the inputs.
#[derive(Clone, Debug, PartialEq)]
enum Phase {
    Pending,
    Failed,
    Ready { names: Vec<String> },
}

fn phase_of(state: &NutritionState, key: u32) -> Phase {
    match state.row(key).map(|r| &r.lookup) {
        Some(Lookup::Ready { candidates, .. }) => Phase::Ready {
            names: candidates.iter().map(|c| c.name.clone()).collect(),
        },
        Some(Lookup::Failed) => Phase::Failed,
        Some(Lookup::Pending) | None => Phase::Pending,
    }
}

/// Ingredient entry, per-row USDA matches and the nutrition label.
#[component]
pub fn NutritionPanel(initial: Vec<String>, servings: String) -> impl IntoView {
    let state = RwSignal::new(NutritionState::new(&servings));
    let entry = RwSignal::new(String::new());

    let add = move |text: String| {
        let Some(key) = state.try_update(|s| s.add_row(&text)).flatten() else {
            return;
        };
        leptos::task::spawn_local(async move {
            let result = api::lookup_nutrition(text.trim()).await;
            state.update(|s| s.resolve(key, result));
        });
    };
    for text in initial {
        add(text);
    }

    let on_add = move || {
        let text = entry.get_untracked();
        entry.set(String::new());
        add(text);
    };

    let label_rows = (0..NUTRIENT_COUNT)
        .map(|i| {
            view! {
                <tr>
                    <th scope="row">{NUTRIENT_NAMES[i]}</th>
                    <td id=format!("nut-{i}")>
                        {move || state.with(|s| s.display_values().swap_remove(i))}
                    </td>
                </tr>
            }
        })
        .collect_view();

    view! {
        <div class="nutrition-estimator">
            <div class="ingredient-entry">
                <input
                    id="ing-input"
                    type="text"
                    placeholder="e.g. 2 cups flour"
                    prop:value=move || entry.get()
                    on:input=move |ev| entry.set(event_target_value(&ev))
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            ev.prevent_default();
                            on_add();
                        }
                    }
                />
                <button id="ing-add" type="button" class="pure-button" on:click=move |_| on_add()>
                    "Add"
                </button>
            </div>
            <ul id="ingredient-zone">
                <For
                    each=move || state.with(|s| s.rows().iter().map(|r| r.key).collect::<Vec<_>>())
                    key=|key| *key
                    children=move |key| ingredient_row(state, key)
                />
            </ul>
            <label class="servings">
                "Servings "
                <input
                    id="servings"
                    name="servings"
                    type="number"
                    min="1"
                    value=servings
                    on:input=move |ev| state.update(|s| s.set_servings(&event_target_value(&ev)))
                />
            </label>
            <table id="nutrition-label">
                <tbody>
                    {label_rows}
                    <tr>
                        <td id="nut-servings" colspan="2">
                            {move || state.with(NutritionState::servings_display)}
                        </td>
                    </tr>
                </tbody>
            </table>
            {move || {
                state
                    .with(NutritionState::ingredient_texts)
                    .into_iter()
                    .map(|text| view! { <input type="hidden" name="ingredients" value=text /> })
                    .collect_view()
            }}
            <input
                type="hidden"
                name="nutrients"
                prop:value=move || state.with(NutritionState::form_payload)
            />
        </div>
    }
}

fn ingredient_row(state: RwSignal<NutritionState>, key: u32) -> impl IntoView {
    let text = state.with_untracked(|s| s.row(key).map(|r| r.text.clone()).unwrap_or_default());
    let phase = Memo::new(move |_| state.with(|s| phase_of(s, key)));

    let match_view = move || match phase.get() {
        Phase::Pending => LOOKUP_PENDING_MESSAGE.into_any(),
        Phase::Failed => LOOKUP_FAILED_MESSAGE.into_any(),
        Phase::Ready { names } => {
            let grams = state.with_untracked(|s| {
                s.row(key)
                    .and_then(|r| r.selection())
                    .map_or(0.0, |(_, grams)| grams)
            });
            let options = names
                .into_iter()
                .enumerate()
                .map(|(i, name)| {
                    view! { <option value=i.to_string() selected={i == 0}>{name}</option> }
                })
                .collect_view();
            view! {
                "USDA Nutritional Match: "
                <input
                    type="number"
                    step="0.01"
                    min="0"
                    class="USDA_grams"
                    value=grams.to_string()
                    on:input=move |ev| state.update(|s| s.set_grams(key, &event_target_value(&ev)))
                />
                " grams of "
                <select
                    class="USDA_base"
                    on:change=move |ev| {
                        let choice = event_target_value(&ev).parse::<usize>().ok();
                        state.update(|s| s.select(key, choice));
                    }
                >
                    <option value="">"None"</option>
                    {options}
                </select>
            }
                .into_any()
        }
    };

    view! {
        <li class="step-list">
            <input class="pure-input-2-3" type="text" readonly value=text />
            <button
                type="button"
                class="pure-button-secondary"
                on:click=move |_| state.update(|s| s.remove(key))
            >
                "Remove"
            </button>
            <span class="pure-form-message">{match_view}</span>
        </li>
    }
}
