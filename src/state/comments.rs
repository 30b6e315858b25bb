//! Threaded comment model.
//!
//! DESIGN
//! ======
//! The server hands out a flat list where replies point at their parent via
//! `parentid`. `CommentTree` rebuilds the hierarchy once and then applies
//! post/edit/delete results in place. A reply whose parent is unknown (or
//! that sits in a parent cycle) is promoted to a root so nothing is lost.

#[cfg(test)]
#[path = "comments_test.rs"]
mod comments_test;

use std::collections::{HashMap, HashSet};

use crate::net::types::Comment;

/// Longest accepted comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 1023;
pub const DELETE_CONFIRM_MESSAGE: &str = "Delete this comment? This cannot be undone.";
pub const EMPTY_THREAD_MESSAGE: &str = "No comments yet — be the first!";
pub const EDITED_FLAG: &str = " (edited)";
pub const POST_FAILED_MESSAGE: &str = "Could not post comment.";
pub const REPLY_FAILED_MESSAGE: &str = "Could not post reply.";
pub const EDIT_FAILED_MESSAGE: &str = "Could not update comment.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete comment.";

/// Why a draft cannot be sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("comment is empty")]
    Empty,
    #[error("Comment must be {max} characters or fewer.")]
    TooLong { max: usize },
}

/// Trim a draft and check it against the length limit.
///
/// # Errors
///
/// `Empty` for blank drafts (callers ignore these silently), `TooLong`
/// past [`MAX_COMMENT_CHARS`].
pub fn validate_draft(raw: &str) -> Result<String, DraftError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DraftError::Empty);
    }
    if trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(DraftError::TooLong {
            max: MAX_COMMENT_CHARS,
        });
    }
    Ok(trimmed.to_owned())
}

/// A comment and its replies, oldest reply first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    fn count(&self) -> usize {
        1 + self.replies.iter().map(Self::count).sum::<usize>()
    }

    fn find(&self, id: u32) -> Option<&Self> {
        if self.comment.commentid == id {
            return Some(self);
        }
        self.replies.iter().find_map(|r| r.find(id))
    }

    fn find_mut(&mut self, id: u32) -> Option<&mut Self> {
        if self.comment.commentid == id {
            return Some(self);
        }
        self.replies.iter_mut().find_map(|r| r.find_mut(id))
    }
}

fn find_in(nodes: &[CommentNode], id: u32) -> Option<&CommentNode> {
    nodes.iter().find_map(|n| n.find(id))
}

fn find_in_mut(nodes: &mut [CommentNode], id: u32) -> Option<&mut CommentNode> {
    nodes.iter_mut().find_map(|n| n.find_mut(id))
}

fn remove_from(nodes: &mut Vec<CommentNode>, id: u32) -> Option<CommentNode> {
    if let Some(pos) = nodes.iter().position(|n| n.comment.commentid == id) {
        return Some(nodes.remove(pos));
    }
    nodes.iter_mut().find_map(|n| remove_from(&mut n.replies, id))
}

/// The whole thread for one recipe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommentTree {
    roots: Vec<CommentNode>,
}

impl CommentTree {
    /// Rebuild the hierarchy from a flat list, keeping the given order for
    /// roots and for each reply list. Later duplicates of an id are dropped.
    #[must_use]
    pub fn build(flat: Vec<Comment>) -> Self {
        let mut seen = HashSet::new();
        let flat: Vec<Comment> = flat
            .into_iter()
            .filter(|c| seen.insert(c.commentid))
            .collect();
        let ids: HashSet<u32> = flat.iter().map(|c| c.commentid).collect();

        let mut children: HashMap<u32, Vec<Comment>> = HashMap::new();
        let mut root_order = Vec::new();
        for comment in &flat {
            match comment.parentid.filter(|p| ids.contains(p) && *p != comment.commentid) {
                Some(parent) => children.entry(parent).or_default().push(comment.clone()),
                None => root_order.push(comment.clone()),
            }
        }

        let mut placed = HashSet::new();
        let mut roots: Vec<CommentNode> = root_order
            .into_iter()
            .map(|c| assemble(c, &mut children, &mut placed))
            .collect();

        // Parent cycles leave comments unreachable from any root.
        for comment in flat {
            if !placed.contains(&comment.commentid) {
                roots.push(assemble(comment, &mut children, &mut placed));
            }
        }
        Self { roots }
    }

    #[must_use]
    pub fn roots(&self) -> &[CommentNode] {
        &self.roots
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of comments, replies included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.roots.iter().map(CommentNode::count).sum()
    }

    #[must_use]
    pub fn find(&self, id: u32) -> Option<&CommentNode> {
        find_in(&self.roots, id)
    }

    /// Ids of the direct replies to `id`, in display order.
    #[must_use]
    pub fn reply_ids(&self, id: u32) -> Vec<u32> {
        self.find(id)
            .map(|n| n.replies.iter().map(|r| r.comment.commentid).collect())
            .unwrap_or_default()
    }

    /// Ids of the top-level comments, in display order.
    #[must_use]
    pub fn root_ids(&self) -> Vec<u32> {
        self.roots.iter().map(|r| r.comment.commentid).collect()
    }

    /// Add a freshly posted comment. Replies go last under their parent;
    /// new top-level comments (and replies to vanished parents) go first.
    pub fn insert(&mut self, comment: Comment) {
        if self.find(comment.commentid).is_some() {
            return;
        }
        let parent = comment
            .parentid
            .and_then(|pid| find_in_mut(&mut self.roots, pid));
        match parent {
            Some(parent) => parent.replies.push(CommentNode::leaf(comment)),
            None => self.roots.insert(0, CommentNode::leaf(comment)),
        }
    }

    /// Apply an edit. A server-provided `lastedit` replaces the timestamp.
    /// Returns `false` when the comment is no longer in the tree.
    pub fn update(&mut self, id: u32, content: String, lastedit: Option<String>) -> bool {
        let Some(node) = find_in_mut(&mut self.roots, id) else {
            return false;
        };
        node.comment.content = content;
        if lastedit.is_some() {
            node.comment.lastedit = lastedit;
        }
        node.comment.edited = true;
        true
    }

    /// Remove a comment together with all of its replies.
    pub fn remove(&mut self, id: u32) -> Option<CommentNode> {
        remove_from(&mut self.roots, id)
    }
}

fn assemble(
    comment: Comment,
    children: &mut HashMap<u32, Vec<Comment>>,
    placed: &mut HashSet<u32>,
) -> CommentNode {
    placed.insert(comment.commentid);
    let mut replies = Vec::new();
    for child in children.remove(&comment.commentid).unwrap_or_default() {
        if !placed.contains(&child.commentid) {
            replies.push(assemble(child, children, placed));
        }
    }
    CommentNode { comment, replies }
}
