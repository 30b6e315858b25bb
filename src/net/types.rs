//! Wire DTOs for the recipe backend's JSON endpoints.
//!
//! DESIGN
//! ======
//! The backend is loose about optional fields (`saved` may be absent,
//! `success` may be missing on 2xx, ids arrive as numbers). Every optional
//! field defaults so a partial body still decodes.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Body of `POST /api/recipe/{id}/save`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SaveRequest {
    pub saved: bool,
}

/// Response of `POST /api/recipe/{id}/save`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub saved: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /api/recipe/{id}/rate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RateRequest {
    pub rating: u8,
}

/// Response of `POST /api/recipe/{id}/rate`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RateResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    /// Present on `409` when the viewer already rated.
    #[serde(default)]
    pub existing_rating: Option<u8>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub ratings_count: Option<u32>,
}

/// A comment as returned by the comment endpoints and embedded in the page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub commentid: u32,
    pub userid: u32,
    #[serde(default)]
    pub username: Option<String>,
    pub content: String,
    #[serde(default)]
    pub lastedit: Option<String>,
    #[serde(default)]
    pub parentid: Option<u32>,
    #[serde(default, alias = "is_edited", alias = "was_edited")]
    pub edited: bool,
}

impl Comment {
    /// Display name, falling back to `User {id}`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| format!("User {}", self.userid), str::to_owned)
    }
}

/// Body of the post/reply endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentRequest {
    pub content: String,
    #[serde(rename = "parentID", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u32>,
}

/// Envelope of post/edit responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct CommentResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub comment: Option<Comment>,
}

/// Bare `{success, message}` envelope (delete, save-profile).
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One candidate match from the nutrition lookup.
///
/// `nutrition` holds per-gram values in label order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NutritionMatch {
    pub name: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub nutrition: Vec<f64>,
}

/// Response of `GET /api/nutrition?ingredient=...`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct NutritionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<NutritionMatch>,
}

/// Profile as returned by `GET /api/get-profile`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub has_image: bool,
}

/// Envelope of `GET /api/get-profile`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
}
