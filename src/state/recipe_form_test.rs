use super::*;

fn tag(id: &str, selected: bool) -> TagOption {
    TagOption {
        id: id.to_owned(),
        label: id.to_owned(),
        selected,
    }
}

// =============================================================
// Steps
// =============================================================

#[test]
fn initial_steps_skip_blank_entries() {
    let list = StepList::new(vec!["Boil water".to_owned(), "  ".to_owned(), "Add pasta".to_owned()]);
    assert_eq!(list.form_values(), vec!["Boil water", "Add pasta"]);
}

#[test]
fn blank_step_is_not_added() {
    let mut list = StepList::default();
    assert_eq!(list.add(""), None);
    assert_eq!(list.add("   "), None);
    assert!(list.steps().is_empty());
}

#[test]
fn steps_keep_order_and_unique_keys() {
    let mut list = StepList::default();
    let first = list.add("Chop onions").unwrap();
    let second = list.add("Fry onions").unwrap();
    assert_ne!(first, second);
    assert_eq!(list.keys(), vec![first, second]);
    assert_eq!(list.text(second), Some("Fry onions"));
}

#[test]
fn removed_step_key_is_not_reused() {
    let mut list = StepList::default();
    let first = list.add("One").unwrap();
    assert!(list.remove(first));
    assert!(!list.remove(first));
    let next = list.add("Two").unwrap();
    assert_ne!(next, first);
    assert_eq!(list.form_values(), vec!["Two"]);
}

#[test]
fn edited_step_is_submitted_with_new_text() {
    let mut list = StepList::new(vec!["Bake 20 min".to_owned()]);
    let key = list.keys()[0];
    assert!(list.edit(key, "Bake 25 min"));
    assert!(!list.edit(key + 100, "nope"));
    assert_eq!(list.form_values(), vec!["Bake 25 min"]);
}

#[test]
fn step_edited_to_blank_is_left_out_of_payload() {
    let mut list = StepList::new(vec!["Stir".to_owned(), "Serve".to_owned()]);
    let key = list.keys()[0];
    list.edit(key, "  ");
    assert_eq!(list.steps().len(), 2);
    assert_eq!(list.form_values(), vec!["Serve"]);
}

// =============================================================
// Tags
// =============================================================

#[test]
fn tag_markup_reads_selection_class() {
    let parsed = TagOption::from_markup("Vegan", Some(" Vegan "), Some("tag tag-select")).unwrap();
    assert_eq!(parsed, tag("Vegan", true));
    let plain = TagOption::from_markup("Quick", None, Some("tag")).unwrap();
    assert_eq!(plain.label, "Quick");
    assert!(!plain.selected);
}

#[test]
fn tag_markup_without_id_is_skipped() {
    assert_eq!(TagOption::from_markup("  ", Some("Label"), None), None);
}

#[test]
fn toggling_tags_updates_submitted_values_in_page_order() {
    let mut tags = TagSelection::new(vec![tag("Dinner", false), tag("Vegan", true), tag("Quick", false)]);
    assert_eq!(tags.toggle("Quick"), Some(true));
    assert_eq!(tags.toggle("Vegan"), Some(false));
    assert_eq!(tags.toggle("Dessert"), None);
    assert!(tags.is_selected("Quick"));
    assert_eq!(tags.form_values(), vec!["Quick"]);

    tags.toggle("Dinner");
    assert_eq!(tags.form_values(), vec!["Dinner", "Quick"]);
}

#[test]
fn duplicate_tags_keep_first_occurrence() {
    let tags = TagSelection::new(vec![tag("Vegan", true), tag("Vegan", false)]);
    assert_eq!(tags.tags().len(), 1);
    assert!(tags.is_selected("Vegan"));
}

// =============================================================
// Submission
// =============================================================

#[test]
fn draft_button_marks_submission_as_draft() {
    assert_eq!(SubmitKind::from_submitter(Some("draft-button")), SubmitKind::Draft);
    assert_eq!(SubmitKind::from_submitter(Some("post-button")), SubmitKind::Publish);
    assert_eq!(SubmitKind::from_submitter(None), SubmitKind::Publish);
}

#[test]
fn draft_payload_carries_link_image_and_flag() {
    let fields = submit_fields(
        SubmitKind::Draft,
        Some(" https://example.com/lasagna "),
        false,
        Some("/api/image/12"),
    );
    assert_eq!(
        fields,
        vec![
            ("link", "https://example.com/lasagna".to_owned()),
            ("imageLink", "/api/image/12".to_owned()),
            ("draft", "true".to_owned()),
        ]
    );
}

#[test]
fn published_payload_with_new_file_omits_image_link_and_draft() {
    let fields = submit_fields(SubmitKind::Publish, None, true, Some("/api/image/12"));
    assert!(fields.is_empty());
}

#[test]
fn local_preview_is_never_sent_as_image_link() {
    assert_eq!(image_link_fallback(false, Some("blob:http://localhost/abc")), None);
    assert_eq!(image_link_fallback(false, Some("data:image/png;base64,AAAA")), None);
    assert_eq!(image_link_fallback(false, Some("")), None);
    assert_eq!(image_link_fallback(false, None), None);
    assert_eq!(
        image_link_fallback(false, Some("https://cdn.example.com/a.jpg")),
        Some("https://cdn.example.com/a.jpg".to_owned())
    );
}
