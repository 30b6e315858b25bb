use super::*;

#[test]
fn default_config_uses_well_known_keys() {
    let config = ClientConfig::default();
    assert_eq!(config.login_path, "/login");
    assert_eq!(config.channel_key, "recipe-save-sync");
    assert_eq!(config.event_name, "save-changed");
    assert_eq!(config.state_key(42), "save-state-42");
}

#[test]
fn login_override_ignores_blank_values() {
    let config = ClientConfig::default().with_login_override(Some("   "));
    assert_eq!(config.login_path, "/login");
    let config = ClientConfig::default().with_login_override(Some("/auth/start"));
    assert_eq!(config.login_path, "/auth/start");
}

#[test]
fn parse_positive_id_rejects_zero_negative_and_garbage() {
    assert_eq!(parse_positive_id("42"), Some(42));
    assert_eq!(parse_positive_id(" 7 "), Some(7));
    assert_eq!(parse_positive_id("0"), None);
    assert_eq!(parse_positive_id("-3"), None);
    assert_eq!(parse_positive_id("abc"), None);
    assert_eq!(parse_positive_id(""), None);
}

#[test]
fn viewer_from_attributes_handles_anonymous() {
    let viewer = Viewer::from_attributes(Some("0"), None);
    assert_eq!(viewer, Viewer::default());
}

#[test]
fn owner_and_admin_can_manage() {
    let owner = Viewer::from_attributes(Some("5"), Some("false"));
    assert!(owner.can_manage(5));
    assert!(!owner.can_manage(6));

    let admin = Viewer::from_attributes(Some("9"), Some("true"));
    assert!(admin.can_manage(6));

    let anon = Viewer::default();
    assert!(!anon.can_manage(5));
}
