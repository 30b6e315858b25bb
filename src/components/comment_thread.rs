//! Threaded comments for the recipe page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted into `#comments` with the page's initial comments. Posting,
//! replying, editing and deleting all go through `net::api`; the tree is
//! updated only from server answers, never optimistically.
//!
//! DESIGN
//! ======
//! Items are rendered by id and read their comment from the shared
//! `CommentTree` signal, so an edit repaints one item and a delete drops a
//! whole subtree. Only one action menu, one edit form and one reply form
//! are open at a time.

#[cfg(test)]
#[path = "comment_thread_test.rs"]
mod comment_thread_test;

use leptos::prelude::*;

use crate::config::Viewer;
use crate::net::api;
use crate::net::types::Comment;
use crate::state::comments::{
    CommentTree, DELETE_CONFIRM_MESSAGE, DELETE_FAILED_MESSAGE, DraftError, EDIT_FAILED_MESSAGE,
    EDITED_FLAG, EMPTY_THREAD_MESSAGE, POST_FAILED_MESSAGE, REPLY_FAILED_MESSAGE, validate_draft,
};
use crate::util::dialog;
use crate::util::time::format_comment_time;

/// Host element id.
pub const HOST_ID: &str = "comments";
/// Id of the `<script type="application/json">` holding the initial comments.
pub const DATA_ID: &str = "commentsData";

#[derive(Clone, Copy)]
struct Thread {
    recipe_id: u32,
    viewer: Viewer,
    tree: RwSignal<CommentTree>,
    open_menu: RwSignal<Option<u32>>,
    editing: RwSignal<Option<u32>>,
    replying: RwSignal<Option<u32>>,
}

/// Check a draft; blank drafts are dropped silently, long ones alert.
fn accept_draft(raw: &str) -> Option<String> {
    match validate_draft(raw) {
        Ok(content) => Some(content),
        Err(DraftError::Empty) => None,
        Err(e @ DraftError::TooLong { .. }) => {
            dialog::alert(&e.to_string());
            None
        }
    }
}

/// Comment list plus the top-level comment form.
#[component]
pub fn CommentThread(recipe_id: u32, initial: Vec<Comment>, viewer: Viewer) -> impl IntoView {
    let thread = Thread {
        recipe_id,
        viewer,
        tree: RwSignal::new(CommentTree::build(initial)),
        open_menu: RwSignal::new(None),
        editing: RwSignal::new(None),
        replying: RwSignal::new(None),
    };
    let draft = RwSignal::new(String::new());
    let posting = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if posting.get_untracked() {
            return;
        }
        let Some(content) = accept_draft(&draft.get_untracked()) else {
            return;
        };
        posting.set(true);
        leptos::task::spawn_local(async move {
            match api::post_comment(recipe_id, content, None).await {
                Ok(comment) => {
                    thread.tree.update(|t| t.insert(comment));
                    draft.set(String::new());
                }
                Err(e) => {
                    leptos::logging::warn!("comment post failed: {e}");
                    dialog::alert(&e.user_message(POST_FAILED_MESSAGE));
                }
            }
            posting.set(false);
        });
    };

    view! {
        <section class="comments" on:click=move |_| thread.open_menu.set(None)>
            <Show when=move || viewer.user_id.is_some()>
                <form id="commentForm" class="comment-form" on:submit=on_submit>
                    <textarea
                        id="commentContent"
                        name="content"
                        rows="3"
                        placeholder="Share your thoughts..."
                        prop:value=move || draft.get()
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    ></textarea>
                    <div class="comment-actions">
                        <button type="submit" class="btn-save" disabled=move || posting.get()>
                            "Post Comment"
                        </button>
                    </div>
                </form>
            </Show>
            <Show
                when=move || !thread.tree.with(CommentTree::is_empty)
                fallback=|| view! { <p id="noCommentsMsg">{EMPTY_THREAD_MESSAGE}</p> }
            >
                <ul class="comment-list">
                    <For
                        each=move || thread.tree.with(CommentTree::root_ids)
                        key=|id| *id
                        children=move |id| comment_item(thread, id)
                    />
                </ul>
            </Show>
        </section>
    }
}

fn comment_item(thread: Thread, id: u32) -> AnyView {
    let comment = Memo::new(move |_| thread.tree.with(|t| t.find(id).map(|n| n.comment.clone())));
    let can_manage = move || {
        comment.with(|c| {
            c.as_ref()
                .is_some_and(|c| thread.viewer.can_manage(c.userid))
        })
    };
    let field = move |f: fn(&Comment) -> String| comment.with(|c| c.as_ref().map(f).unwrap_or_default());

    let edit_draft = RwSignal::new(String::new());
    let reply_draft = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let close_edit = move || {
        if thread.editing.get_untracked() == Some(id) {
            thread.editing.set(None);
        }
    };
    let close_reply = move || {
        reply_draft.set(String::new());
        if thread.replying.get_untracked() == Some(id) {
            thread.replying.set(None);
        }
    };

    let on_toggle_menu = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        ev.stop_propagation();
        thread
            .open_menu
            .update(|open| *open = if *open == Some(id) { None } else { Some(id) });
    };

    let on_edit = move |_| {
        thread.open_menu.set(None);
        edit_draft.set(field(|c| c.content.trim().to_owned()));
        thread.editing.set(Some(id));
    };

    let on_delete = move |_| {
        thread.open_menu.set(None);
        if !dialog::confirm(DELETE_CONFIRM_MESSAGE) {
            return;
        }
        leptos::task::spawn_local(async move {
            match api::delete_comment(id).await {
                Ok(()) => {
                    thread.tree.update(|t| {
                        t.remove(id);
                    });
                }
                Err(e) => dialog::alert(&e.user_message(DELETE_FAILED_MESSAGE)),
            }
        });
    };

    let on_edit_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let Some(content) = accept_draft(&edit_draft.get_untracked()) else {
            return;
        };
        busy.set(true);
        leptos::task::spawn_local(async move {
            match api::edit_comment(id, content.clone()).await {
                Ok(returned) => {
                    let (text, lastedit) = match returned {
                        Some(c) => (c.content, c.lastedit),
                        None => (content, None),
                    };
                    thread.tree.update(|t| {
                        t.update(id, text, lastedit);
                    });
                    close_edit();
                }
                Err(e) => {
                    leptos::logging::warn!("comment {id} edit failed: {e}");
                    dialog::alert(&e.user_message(EDIT_FAILED_MESSAGE));
                }
            }
            busy.set(false);
        });
    };

    let on_reply_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let Some(content) = accept_draft(&reply_draft.get_untracked()) else {
            return;
        };
        busy.set(true);
        leptos::task::spawn_local(async move {
            match api::post_comment(thread.recipe_id, content, Some(id)).await {
                Ok(reply) => {
                    thread.tree.update(|t| t.insert(reply));
                    close_reply();
                }
                Err(e) => {
                    leptos::logging::warn!("reply to comment {id} failed: {e}");
                    dialog::alert(&e.user_message(REPLY_FAILED_MESSAGE));
                }
            }
            busy.set(false);
        });
    };

    let on_escape = move |ev: leptos::ev::KeyboardEvent, close: &dyn Fn()| {
        if ev.key() == "Escape" {
            ev.prevent_default();
            close();
        }
    };

    view! {
        <li class="comment-item" data-comment-id=id.to_string()>
            <div class="comment-header">
                <div class="comment-meta">
                    <strong class="comment-user">{move || field(Comment::display_name)}</strong>
                    <span class="comment-time">
                        {move || comment.with(|c| {
                            format_comment_time(c.as_ref().and_then(|c| c.lastedit.as_deref()))
                        })}
                    </span>
                    <Show when=move || comment.with(|c| c.as_ref().is_some_and(|c| c.edited))>
                        <span class="edited-flag">{EDITED_FLAG}</span>
                    </Show>
                </div>
                <Show when=can_manage>
                    <div class="dropdown">
                        <button
                            type="button"
                            class="menu-toggle"
                            aria-label="Comment actions"
                            aria-expanded=move || (thread.open_menu.get() == Some(id)).to_string()
                            on:click=on_toggle_menu
                        >
                            "⋯"
                        </button>
                        <ul class="menu" hidden=move || thread.open_menu.get() != Some(id)>
                            <li>
                                <button type="button" class="comment-edit" on:click=on_edit>
                                    "✏️ Edit"
                                </button>
                            </li>
                            <li>
                                <button type="button" class="comment-delete" on:click=on_delete>
                                    "🗑 Delete"
                                </button>
                            </li>
                        </ul>
                    </div>
                </Show>
            </div>
            <p class="comment-body" class:hidden=move || thread.editing.get() == Some(id)>
                {move || field(|c| c.content.clone())}
            </p>
            <Show when=move || thread.viewer.user_id.is_some()>
                <button
                    type="button"
                    class="reply-btn btn-save"
                    on:click=move |_| {
                        thread
                            .replying
                            .update(|open| *open = if *open == Some(id) { None } else { Some(id) });
                    }
                >
                    "Reply"
                </button>
            </Show>
            <Show when=move || thread.editing.get() == Some(id)>
                <form class="edit-form comment-form" on:submit=on_edit_submit>
                    <textarea
                        name="content"
                        rows="2"
                        placeholder="Edit your comment..."
                        prop:value=move || edit_draft.get()
                        on:input=move |ev| edit_draft.set(event_target_value(&ev))
                        on:keydown=move |ev| on_escape(ev, &close_edit)
                    ></textarea>
                    <div class="comment-actions">
                        <button type="submit" class="btn-save" disabled=move || busy.get()>
                            "Save"
                        </button>
                        <button type="button" class="btn-cancel btn-save" on:click=move |_| close_edit()>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>
            <Show when=move || thread.replying.get() == Some(id)>
                <form class="reply-form comment-form" on:submit=on_reply_submit>
                    <textarea
                        name="content"
                        rows="2"
                        placeholder="Write a reply..."
                        prop:value=move || reply_draft.get()
                        on:input=move |ev| reply_draft.set(event_target_value(&ev))
                        on:keydown=move |ev| on_escape(ev, &close_reply)
                    ></textarea>
                    <div class="comment-actions">
                        <button type="submit" class="btn-save" disabled=move || busy.get()>
                            "Post Reply"
                        </button>
                        <button type="button" class="btn-cancel btn-save" on:click=move |_| close_reply()>
                            "Cancel"
                        </button>
                    </div>
                </form>
            </Show>
            <ul class="comment-list comment-children">
                <For
                    each=move || thread.tree.with(|t| t.reply_ids(id))
                    key=|id| *id
                    children=move |child| comment_item(thread, child)
                />
            </ul>
        </li>
    }
    .into_any()
}

/// Parse the embedded JSON list of initial comments. Bad data yields an
/// empty thread.
#[must_use]
pub fn parse_initial(raw: &str) -> Vec<Comment> {
    match serde_json::from_str(raw) {
        Ok(comments) => comments,
        Err(e) => {
            leptos::logging::warn!("initial comments unreadable: {e}");
            Vec::new()
        }
    }
}
