use super::*;

fn comment(id: u32, parent: Option<u32>) -> Comment {
    Comment {
        commentid: id,
        userid: 1,
        username: Some("cook".to_owned()),
        content: format!("comment {id}"),
        lastedit: None,
        parentid: parent,
        edited: false,
    }
}

// =============================================================
// Drafts
// =============================================================

#[test]
fn draft_is_trimmed() {
    assert_eq!(validate_draft("  tasty  \n"), Ok("tasty".to_owned()));
}

#[test]
fn blank_draft_is_empty() {
    assert_eq!(validate_draft(" \n\t"), Err(DraftError::Empty));
}

#[test]
fn draft_limit_counts_characters() {
    let at_limit = "é".repeat(MAX_COMMENT_CHARS);
    assert!(validate_draft(&at_limit).is_ok());
    let over = "a".repeat(MAX_COMMENT_CHARS + 1);
    assert_eq!(
        validate_draft(&over),
        Err(DraftError::TooLong {
            max: MAX_COMMENT_CHARS
        })
    );
}

// =============================================================
// Building
// =============================================================

#[test]
fn build_nests_replies_in_order() {
    let tree = CommentTree::build(vec![
        comment(5, None),
        comment(6, Some(5)),
        comment(3, None),
        comment(7, Some(5)),
        comment(8, Some(6)),
    ]);
    assert_eq!(tree.root_ids(), vec![5, 3]);
    assert_eq!(tree.reply_ids(5), vec![6, 7]);
    assert_eq!(tree.reply_ids(6), vec![8]);
    assert_eq!(tree.len(), 5);
}

#[test]
fn orphans_become_roots() {
    let tree = CommentTree::build(vec![comment(2, Some(99)), comment(1, None)]);
    assert_eq!(tree.root_ids(), vec![2, 1]);
}

#[test]
fn parent_cycles_do_not_lose_comments() {
    let tree = CommentTree::build(vec![comment(1, Some(2)), comment(2, Some(1)), comment(3, Some(3))]);
    assert_eq!(tree.len(), 3);
    assert!(tree.root_ids().contains(&3));
}

#[test]
fn duplicate_ids_keep_first() {
    let mut dup = comment(1, None);
    dup.content = "later".to_owned();
    let tree = CommentTree::build(vec![comment(1, None), dup]);
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.find(1).unwrap().comment.content, "comment 1");
}

// =============================================================
// Mutations
// =============================================================

#[test]
fn new_root_goes_first_and_reply_goes_last() {
    let mut tree = CommentTree::build(vec![comment(1, None), comment(2, Some(1))]);
    tree.insert(comment(3, None));
    tree.insert(comment(4, Some(1)));
    assert_eq!(tree.root_ids(), vec![3, 1]);
    assert_eq!(tree.reply_ids(1), vec![2, 4]);
}

#[test]
fn reply_to_deleted_parent_becomes_root() {
    let mut tree = CommentTree::build(vec![comment(1, None)]);
    tree.insert(comment(9, Some(50)));
    assert_eq!(tree.root_ids(), vec![9, 1]);
}

#[test]
fn insert_ignores_known_ids() {
    let mut tree = CommentTree::build(vec![comment(1, None)]);
    tree.insert(comment(1, None));
    assert_eq!(tree.len(), 1);
}

#[test]
fn update_marks_edited_and_keeps_time_without_new_one() {
    let mut original = comment(1, None);
    original.lastedit = Some("2024-01-01 10:00:00".to_owned());
    let mut tree = CommentTree::build(vec![original]);

    assert!(tree.update(1, "fixed".to_owned(), None));
    let node = tree.find(1).unwrap();
    assert_eq!(node.comment.content, "fixed");
    assert!(node.comment.edited);
    assert_eq!(node.comment.lastedit.as_deref(), Some("2024-01-01 10:00:00"));

    assert!(tree.update(1, "again".to_owned(), Some("2024-01-02 09:00:00".to_owned())));
    assert_eq!(
        tree.find(1).unwrap().comment.lastedit.as_deref(),
        Some("2024-01-02 09:00:00")
    );
    assert!(!tree.update(42, "gone".to_owned(), None));
}

#[test]
fn remove_takes_whole_subtree() {
    let mut tree = CommentTree::build(vec![
        comment(1, None),
        comment(2, Some(1)),
        comment(3, Some(2)),
        comment(4, None),
    ]);
    let removed = tree.remove(2).unwrap();
    assert_eq!(removed.replies.len(), 1);
    assert_eq!(tree.len(), 2);
    assert!(tree.find(3).is_none());

    tree.remove(1);
    tree.remove(4);
    assert!(tree.is_empty());
    assert!(tree.remove(4).is_none());
}
