//! Profile editor model: sanitising, validation and image checks.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use crate::net::types::Profile;

pub const NAME_MIN_CHARS: usize = 4;
pub const NAME_MAX_CHARS: usize = 100;
pub const BIO_MAX_CHARS: usize = 500;
/// Largest accepted avatar, in bytes (2.5 MB).
pub const MAX_IMAGE_BYTES: f64 = 2.5 * 1024.0 * 1024.0;
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

pub const NAME_PLACEHOLDER: &str = "Your Name";
pub const BIO_PLACEHOLDER: &str =
    "Your bio will appear here. Click \"Edit Profile\" to add information about yourself.";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load profile. Please refresh the page.";
pub const SAVE_ERROR_MESSAGE: &str = "Error saving profile. Please try again.";
/// Avatar endpoint; a cache-busting query is appended on every load.
pub const PROFILE_IMAGE_URL: &str = "/api/profile-image";

/// Rejected profile input. Display strings are shown to the user as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    #[error("Name must be at least 4 characters long")]
    NameTooShort,
    #[error("Name must be 100 characters or less")]
    NameTooLong,
    #[error("Bio must be 500 characters or less")]
    BioTooLong,
    #[error("Please upload a valid image file (JPEG, PNG, GIF, or WebP)")]
    ImageType,
    #[error("Image must be smaller than 2.5MB")]
    ImageTooLarge,
}

/// Strip anything tag-shaped, trim, and cut to `max_chars` characters.
#[must_use]
pub fn sanitize_text(raw: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.trim().chars().take(max_chars).collect()
}

/// Check trimmed name and bio before saving.
///
/// # Errors
///
/// The first failing rule, name checked before bio.
pub fn validate(name: &str, bio: &str) -> Result<(), ProfileError> {
    let name_len = name.trim().chars().count();
    if name_len < NAME_MIN_CHARS {
        return Err(ProfileError::NameTooShort);
    }
    if name_len > NAME_MAX_CHARS {
        return Err(ProfileError::NameTooLong);
    }
    if bio.trim().chars().count() > BIO_MAX_CHARS {
        return Err(ProfileError::BioTooLong);
    }
    Ok(())
}

/// Inline hint while typing: shown for 1–3 characters only.
#[must_use]
pub fn name_hint_visible(name: &str) -> bool {
    let len = name.trim().chars().count();
    len > 0 && len < NAME_MIN_CHARS
}

/// Check an avatar's MIME type and size.
///
/// # Errors
///
/// `ImageType` for unsupported types, `ImageTooLarge` past [`MAX_IMAGE_BYTES`].
pub fn validate_image(mime: &str, size_bytes: f64) -> Result<(), ProfileError> {
    if !ALLOWED_IMAGE_TYPES.contains(&mime) {
        return Err(ProfileError::ImageType);
    }
    if size_bytes > MAX_IMAGE_BYTES {
        return Err(ProfileError::ImageTooLarge);
    }
    Ok(())
}

/// What the profile card shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileView {
    /// Sanitised values, empty when unset.
    pub name: String,
    pub bio: String,
    pub has_image: bool,
    /// Set when loading failed.
    pub load_error: bool,
}

impl ProfileView {
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            name: sanitize_text(profile.name.as_deref().unwrap_or_default(), NAME_MAX_CHARS),
            bio: sanitize_text(profile.bio.as_deref().unwrap_or_default(), BIO_MAX_CHARS),
            has_image: profile.has_image,
            load_error: false,
        }
    }

    #[must_use]
    pub fn failed() -> Self {
        Self {
            load_error: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { NAME_PLACEHOLDER } else { &self.name }
    }

    #[must_use]
    pub fn display_bio(&self) -> &str {
        if self.load_error {
            LOAD_FAILED_MESSAGE
        } else if self.bio.is_empty() {
            BIO_PLACEHOLDER
        } else {
            &self.bio
        }
    }
}

/// Alert text for a save the server refused.
#[must_use]
pub fn save_failed_message(server_message: &str) -> String {
    let reason = server_message.trim();
    let reason = if reason.is_empty() { "Unknown error" } else { reason };
    format!("Failed to save profile: {reason}")
}
