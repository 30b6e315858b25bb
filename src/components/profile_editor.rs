//! Profile card with inline editing on the viewer's profile page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted into `#profileEditor`. Loads `/api/get-profile` on mount and
//! again after every successful save, so the card always shows what the
//! server stored.

use leptos::prelude::*;

use crate::error::ApiError;
use crate::state::profile::{
    BIO_MAX_CHARS, NAME_MAX_CHARS, PROFILE_IMAGE_URL, ProfileView, SAVE_ERROR_MESSAGE,
    name_hint_visible, save_failed_message, validate,
};
use crate::util::dialog;

/// Host element id.
pub const HOST_ID: &str = "profileEditor";

/// Load the profile into `view`, bumping `image_version` so the avatar URL
/// changes and the browser refetches it.
fn reload(view: RwSignal<ProfileView>, image_version: RwSignal<u32>, login_path: String) {
    leptos::task::spawn_local(async move {
        match crate::net::api::fetch_profile().await {
            Ok(profile) => {
                view.set(ProfileView::from_profile(&profile));
                image_version.update(|v| *v += 1);
            }
            Err(ApiError::Unauthorized) => dialog::navigate(&login_path),
            Err(e) => {
                leptos::logging::warn!("profile load failed: {e}");
                view.set(ProfileView::failed());
            }
        }
    });
}

/// Map a save failure to the notice shown to the user.
fn save_error_notice(error: &ApiError) -> String {
    match error {
        ApiError::Rejected(message) => save_failed_message(message),
        _ => SAVE_ERROR_MESSAGE.to_owned(),
    }
}

/// Viewer's own profile: name, bio, avatar and the edit form.
#[component]
pub fn ProfileEditor(login_path: String) -> impl IntoView {
    let view_state = RwSignal::new(ProfileView::default());
    let image_version = RwSignal::new(0_u32);
    let editing = RwSignal::new(false);
    let saving = RwSignal::new(false);
    let name_draft = RwSignal::new(String::new());
    let bio_draft = RwSignal::new(String::new());
    let preview_url = RwSignal::new(None::<String>);
    let file_ref = NodeRef::<leptos::html::Input>::new();

    reload(view_state, image_version, login_path.clone());

    let on_edit = move |_| {
        view_state.with_untracked(|v| {
            name_draft.set(v.name.clone());
            bio_draft.set(v.bio.clone());
        });
        editing.set(true);
    };

    let on_file_change = move |_| {
        #[cfg(feature = "csr")]
        {
            let Some(input) = file_ref.get_untracked() else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            if let Err(e) =
                crate::state::profile::validate_image(&file.type_(), file.size())
            {
                dialog::alert(&e.to_string());
                input.set_value("");
                return;
            }
            match web_sys::Url::create_object_url_with_blob(&file) {
                Ok(url) => {
                    if let Some(old) = preview_url.get_untracked() {
                        let _ = web_sys::Url::revoke_object_url(&old);
                    }
                    preview_url.set(Some(url));
                }
                Err(e) => {
                    leptos::logging::warn!("image preview failed: {e:?}");
                    dialog::alert("Failed to load image preview");
                    input.set_value("");
                }
            }
        }
    };

    let on_save = {
        let login_path = login_path.clone();
        move |_| {
            if saving.get_untracked() {
                return;
            }
            let name = name_draft.get_untracked().trim().to_owned();
            let bio = bio_draft.get_untracked().trim().to_owned();
            if let Err(e) = validate(&name, &bio) {
                dialog::alert(&e.to_string());
                return;
            }
            editing.set(false);
            saving.set(true);
            view_state.update(|v| {
                v.name.clone_from(&name);
                v.bio.clone_from(&bio);
                v.load_error = false;
            });
            #[cfg(feature = "csr")]
            {
                let image = file_ref
                    .get_untracked()
                    .and_then(|input| input.files())
                    .and_then(|files| files.get(0));
                let login_path = login_path.clone();
                leptos::task::spawn_local(async move {
                    match crate::net::api::save_profile(&name, &bio, image).await {
                        Ok(()) => {
                            preview_url.set(None);
                            reload(view_state, image_version, login_path);
                        }
                        Err(ApiError::Unauthorized) => dialog::navigate(&login_path),
                        Err(e) => {
                            leptos::logging::warn!("profile save failed: {e}");
                            dialog::alert(&save_error_notice(&e));
                        }
                    }
                    saving.set(false);
                });
            }
            #[cfg(not(feature = "csr"))]
            {
                let _ = &login_path;
                saving.set(false);
            }
        }
    };

    let avatar_src = move || {
        preview_url.get().or_else(|| {
            view_state
                .with(|v| v.has_image)
                .then(|| format!("{PROFILE_IMAGE_URL}?v={}", image_version.get()))
        })
    };

    let pick_image = move |_| {
        if editing.get_untracked() {
            if let Some(input) = file_ref.get_untracked() {
                input.click();
            }
        }
    };

    view! {
        <div class="profile-card">
            <div class="upload-box" class:editable=move || editing.get() on:click=pick_image>
                <Show
                    when=move || avatar_src().is_some()
                    fallback=|| view! { <span class="plus-sign">"+"</span> }
                >
                    <img class="profile-img" alt="Profile picture" src=move || avatar_src().unwrap_or_default() />
                </Show>
                <input
                    node_ref=file_ref
                    type="file"
                    accept="image/jpeg,image/png,image/gif,image/webp"
                    class="hidden"
                    disabled=move || !editing.get()
                    on:change=on_file_change
                />
            </div>
            <Show
                when=move || editing.get()
                fallback=move || {
                    view! {
                        <div class="static-fields">
                            <h2 class="display-name">{move || view_state.with(|v| v.display_name().to_owned())}</h2>
                            <p class="display-bio">{move || view_state.with(|v| v.display_bio().to_owned())}</p>
                            <button type="button" class="btn edit-btn" on:click=on_edit disabled=move || saving.get()>
                                "Edit Profile"
                            </button>
                        </div>
                    }
                }
            >
                <div class="edit-fields">
                    <label>
                        "Name"
                        <input
                            type="text"
                            maxlength=NAME_MAX_CHARS.to_string()
                            class:invalid=move || name_draft.with(|n| name_hint_visible(n))
                            prop:value=move || name_draft.get()
                            on:input=move |ev| name_draft.set(event_target_value(&ev))
                        />
                    </label>
                    <Show when=move || name_draft.with(|n| name_hint_visible(n))>
                        <p class="name-error">"Name must be at least 4 characters long"</p>
                    </Show>
                    <label>
                        "Bio"
                        <textarea
                            rows="4"
                            maxlength=BIO_MAX_CHARS.to_string()
                            prop:value=move || bio_draft.get()
                            on:input=move |ev| bio_draft.set(event_target_value(&ev))
                        ></textarea>
                    </label>
                    <button type="button" class="btn btn--primary save-btn" on:click=on_save.clone()>
                        "Save"
                    </button>
                </div>
            </Show>
        </div>
    }
}
