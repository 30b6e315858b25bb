use super::*;

// =============================================================
// Sanitising
// =============================================================

#[test]
fn sanitize_strips_tags_and_trims() {
    assert_eq!(sanitize_text("  <b>Chef</b> Ana <script>x</script> ", 100), "Chef Ana x");
}

#[test]
fn sanitize_keeps_unclosed_angle_bracket() {
    assert_eq!(sanitize_text("3 < 4", 100), "3 < 4");
}

#[test]
fn sanitize_truncates_by_characters() {
    assert_eq!(sanitize_text("ééééé", 3), "ééé");
}

// =============================================================
// Validation
// =============================================================

#[test]
fn name_length_is_enforced() {
    assert_eq!(validate("Ana", ""), Err(ProfileError::NameTooShort));
    assert_eq!(validate(&"n".repeat(101), ""), Err(ProfileError::NameTooLong));
    assert_eq!(validate("  Anna  ", ""), Ok(()));
}

#[test]
fn bio_length_is_enforced() {
    assert_eq!(validate("Anna", &"b".repeat(501)), Err(ProfileError::BioTooLong));
    assert_eq!(validate("Anna", &"b".repeat(500)), Ok(()));
}

#[test]
fn name_hint_only_for_short_non_empty_names() {
    assert!(!name_hint_visible(""));
    assert!(name_hint_visible("An"));
    assert!(!name_hint_visible("Anna"));
}

#[test]
fn image_type_and_size_are_checked() {
    assert_eq!(validate_image("image/png", 1024.0), Ok(()));
    assert_eq!(validate_image("image/svg+xml", 10.0), Err(ProfileError::ImageType));
    assert_eq!(validate_image("image/jpeg", MAX_IMAGE_BYTES + 1.0), Err(ProfileError::ImageTooLarge));
    assert_eq!(
        ProfileError::ImageTooLarge.to_string(),
        "Image must be smaller than 2.5MB"
    );
}

// =============================================================
// View
// =============================================================

#[test]
fn view_falls_back_to_placeholders() {
    let view = ProfileView::from_profile(&Profile::default());
    assert_eq!(view.display_name(), NAME_PLACEHOLDER);
    assert_eq!(view.display_bio(), BIO_PLACEHOLDER);
}

#[test]
fn view_sanitises_loaded_profile() {
    let profile = Profile {
        name: Some("<i>Anna</i>".to_owned()),
        bio: Some("Bakes bread".to_owned()),
        has_image: true,
    };
    let view = ProfileView::from_profile(&profile);
    assert_eq!(view.display_name(), "Anna");
    assert_eq!(view.display_bio(), "Bakes bread");
    assert!(view.has_image);
}

#[test]
fn failed_load_shows_message() {
    let view = ProfileView::failed();
    assert_eq!(view.display_name(), NAME_PLACEHOLDER);
    assert_eq!(view.display_bio(), LOAD_FAILED_MESSAGE);
}

#[test]
fn save_failure_message_names_reason() {
    assert_eq!(save_failed_message("Bio too long"), "Failed to save profile: Bio too long");
    assert_eq!(save_failed_message(""), "Failed to save profile: Unknown error");
}
