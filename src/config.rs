//! Client configuration and per-page viewer context.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns sessions; the client only learns who is viewing the page
//! from `<body>` data attributes. Storage keys and the login path are fixed
//! defaults that a page may override through the same attributes.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Key prefix for cached per-recipe save state (`save-state-{id}`).
pub const SAVE_STATE_PREFIX: &str = "save-state-";
/// Shared key written once per broadcast to signal sibling tabs.
pub const SAVE_CHANNEL_KEY: &str = "recipe-save-sync";
/// Name of the in-page custom event carrying a save change.
pub const SAVE_EVENT: &str = "save-changed";
/// Default authentication entry point.
pub const LOGIN_PATH: &str = "/login";

/// Static client settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub login_path: String,
    pub state_prefix: String,
    pub channel_key: String,
    pub event_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            login_path: LOGIN_PATH.to_owned(),
            state_prefix: SAVE_STATE_PREFIX.to_owned(),
            channel_key: SAVE_CHANNEL_KEY.to_owned(),
            event_name: SAVE_EVENT.to_owned(),
        }
    }
}

impl ClientConfig {
    /// Apply an optional `data-login-url` override. Blank values are ignored.
    #[must_use]
    pub fn with_login_override(mut self, login_url: Option<&str>) -> Self {
        if let Some(url) = login_url.map(str::trim).filter(|u| !u.is_empty()) {
            self.login_path = url.to_owned();
        }
        self
    }

    /// Storage key holding the cached state for `recipe_id`.
    #[must_use]
    pub fn state_key(&self, recipe_id: u32) -> String {
        format!("{}{recipe_id}", self.state_prefix)
    }
}

/// Who is looking at the page, as rendered by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    /// Logged-in user id, `None` for anonymous visitors.
    pub user_id: Option<u32>,
    pub is_admin: bool,
}

impl Viewer {
    /// Build from raw `data-user-id` / `data-is-admin` attribute values.
    #[must_use]
    pub fn from_attributes(user_id: Option<&str>, is_admin: Option<&str>) -> Self {
        Self {
            user_id: user_id.and_then(parse_positive_id),
            is_admin: is_admin.is_some_and(|v| v.trim() == "true"),
        }
    }

    /// Whether this viewer may edit or delete content authored by `author_id`.
    #[must_use]
    pub fn can_manage(&self, author_id: u32) -> bool {
        self.is_admin || self.user_id == Some(author_id)
    }
}

/// Parse a strictly positive integer id from markup.
#[must_use]
pub fn parse_positive_id(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|id| *id > 0)
}

/// Read the viewer and config from the current document's `<body>`.
#[cfg(feature = "csr")]
pub fn from_document() -> (ClientConfig, Viewer) {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body());
    let Some(body) = body else {
        return (ClientConfig::default(), Viewer::default());
    };
    let viewer = Viewer::from_attributes(
        body.get_attribute("data-user-id").as_deref(),
        body.get_attribute("data-is-admin").as_deref(),
    );
    let config = ClientConfig::default()
        .with_login_override(body.get_attribute("data-login-url").as_deref());
    (config, viewer)
}
