//! Five-star rating control for the recipe page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted into `#ratingWidget`. The average and count live elsewhere in
//! the server markup (`#avgRating`, `#ratingCount`) and are rewritten in
//! place after a successful rating.

use leptos::prelude::*;

use crate::state::rating::{MAX_STARS, RatingEffect, RatingState};
use crate::util::{dialog, dom};

/// Host element id.
pub const HOST_ID: &str = "ratingWidget";

/// Star rating bound to one recipe.
#[component]
pub fn RatingWidget(recipe_id: u32, initial: RatingState, login_path: String) -> impl IntoView {
    let state = RwSignal::new(initial);

    Effect::new(move || {
        let snapshot = state.get();
        dom::set_attr_by_id(HOST_ID, "data-current", &snapshot.committed.to_string());
        dom::set_attr_by_id(HOST_ID, "data-locked", if snapshot.locked { "true" } else { "false" });
        if let Some(avg) = snapshot.average_display() {
            dom::set_text_by_id("avgRating", &avg);
        }
        if let Some(count) = snapshot.count {
            dom::set_text_by_id("ratingCount", &count.to_string());
        }
    });

    let on_pick = Callback::new(move |value: u8| {
        let Some(rating) = state.try_update(|s| s.select(value)).flatten() else {
            return;
        };
        let login_path = login_path.clone();
        leptos::task::spawn_local(async move {
            let result = crate::net::api::rate_recipe(recipe_id, rating).await;
            match state.try_update(|s| s.settle(result)) {
                Some(RatingEffect::Redirect) => dialog::navigate(&login_path),
                Some(RatingEffect::Alert(message)) => dialog::alert(&message),
                Some(RatingEffect::None) | None => {}
            }
        });
    });

    let stars = (1..=MAX_STARS)
        .map(|value| {
            view! {
                <span
                    class="star"
                    role="button"
                    tabindex="0"
                    data-value=value.to_string()
                    aria-label=format!("Rate {value} of {MAX_STARS}")
                    class:active=move || state.with(|s| s.star_classes(value).0)
                    class:preview=move || state.with(|s| s.star_classes(value).1)
                    on:mouseenter=move |_| state.update(|s| s.hover(value))
                    on:click=move |_| on_pick.run(value)
                    on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                        if ev.key() == "Enter" || ev.key() == " " {
                            ev.prevent_default();
                            on_pick.run(value);
                        }
                    }
                >
                    "★"
                </span>
            }
        })
        .collect_view();

    view! {
        <div
            class="rating-stars"
            class:locked=move || state.with(|s| s.locked)
            aria-busy=move || if state.with(|s| s.pending) { "true" } else { "false" }
            on:mouseleave=move |_| state.update(RatingState::leave)
        >
            {stars}
        </div>
    }
}
