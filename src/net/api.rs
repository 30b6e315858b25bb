//! REST API helpers for the recipe backend.
//!
//! Client-side (csr): real HTTP calls via `gloo-net`.
//! Native builds (tests, tooling): stubs returning `ApiError::Transport`,
//! since these endpoints are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Each call reduces the response to `Result<_, ApiError>` through a pure
//! `classify_*` function so status and body handling can be tested without
//! a browser. `401` maps to `ApiError::Unauthorized` wherever the backend
//! guards the endpoint with a login check.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

#[cfg(any(test, feature = "csr"))]
use super::types::{CommentResponse, RateResponse, SaveResponse, StatusResponse};
use super::types::{Comment, NutritionMatch, Profile};
#[cfg(any(test, feature = "csr"))]
use super::types::{NutritionResponse, ProfileResponse};
use crate::error::ApiError;

#[cfg(not(feature = "csr"))]
const NOT_IN_BROWSER: &str = "not available outside the browser";

/// Nutrition lookup endpoint; takes `?ingredient=<text>`.
pub const NUTRITION_ENDPOINT: &str = "/api/nutrition";
/// Profile read endpoint.
pub const PROFILE_ENDPOINT: &str = "/api/get-profile";
/// Profile multipart save endpoint.
pub const SAVE_PROFILE_ENDPOINT: &str = "/api/save-profile";

#[cfg(any(test, feature = "csr"))]
fn save_endpoint(recipe_id: u32) -> String {
    format!("/api/recipe/{recipe_id}/save")
}

#[cfg(any(test, feature = "csr"))]
fn rate_endpoint(recipe_id: u32) -> String {
    format!("/api/recipe/{recipe_id}/rate")
}

#[cfg(any(test, feature = "csr"))]
fn comments_endpoint(recipe_id: u32) -> String {
    format!("/api/recipe/{recipe_id}/comments")
}

#[cfg(any(test, feature = "csr"))]
fn edit_comment_endpoint(comment_id: u32) -> String {
    format!("/api/comment/{comment_id}/edit")
}

#[cfg(any(test, feature = "csr"))]
fn delete_comment_endpoint(comment_id: u32) -> String {
    format!("/api/comment/{comment_id}")
}

#[cfg(any(test, feature = "csr"))]
fn delete_recipe_endpoint(recipe_id: u32) -> String {
    format!("/recipe/{recipe_id}/delete")
}

/// Fallback for servers that do not route `DELETE`.
#[cfg(any(test, feature = "csr"))]
fn delete_comment_fallback_endpoint(comment_id: u32) -> String {
    format!("/api/comment/{comment_id}/delete")
}

#[cfg(any(test, feature = "csr"))]
fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(any(test, feature = "csr"))]
fn rejected(message: Option<String>) -> ApiError {
    ApiError::Rejected(message.unwrap_or_default())
}

// =============================================================
// Response classification
// =============================================================

/// Reduce a save-toggle response to the confirmed `saved` flag, if any.
///
/// A 2xx body that fails to decode counts as a failure; a decoded body
/// without `success` counts as accepted.
#[cfg(any(test, feature = "csr"))]
fn classify_save(status: u16, body: Result<SaveResponse, String>) -> Result<Option<bool>, ApiError> {
    if status == 401 {
        return Err(ApiError::Unauthorized);
    }
    if !is_success(status) {
        return Err(rejected(body.ok().and_then(|b| b.message)));
    }
    let body = body.map_err(ApiError::Decode)?;
    if body.success == Some(false) {
        return Err(rejected(body.message));
    }
    Ok(body.saved)
}

/// Aggregate returned by a successful rating.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RatingSummary {
    pub average: Option<f64>,
    pub count: Option<u32>,
}

#[cfg(any(test, feature = "csr"))]
fn classify_rate(status: u16, body: Result<RateResponse, String>) -> Result<RatingSummary, ApiError> {
    match status {
        401 => return Err(ApiError::Unauthorized),
        409 => {
            let existing = body.ok().and_then(|b| b.existing_rating).unwrap_or(0);
            return Err(ApiError::AlreadyRated { existing });
        }
        _ => {}
    }
    let ok = is_success(status);
    let body = match body {
        Ok(body) => body,
        Err(e) if ok => return Err(ApiError::Decode(e)),
        Err(_) => return Err(rejected(None)),
    };
    if !ok || body.success != Some(true) {
        return Err(rejected(body.message));
    }
    Ok(RatingSummary {
        average: body.avg_rating,
        count: body.ratings_count,
    })
}

/// Post/reply must return the stored comment.
#[cfg(any(test, feature = "csr"))]
fn classify_comment_post(
    status: u16,
    body: Result<CommentResponse, String>,
) -> Result<Comment, ApiError> {
    let ok = is_success(status);
    let body = match body {
        Ok(body) => body,
        Err(e) if ok => return Err(ApiError::Decode(e)),
        Err(_) => return Err(rejected(None)),
    };
    if !ok || body.success != Some(true) {
        return Err(rejected(body.message));
    }
    body.comment
        .ok_or_else(|| ApiError::Decode("response carried no comment".to_owned()))
}

/// Edit may omit the comment; the caller then keeps the submitted text.
#[cfg(any(test, feature = "csr"))]
fn classify_comment_edit(
    status: u16,
    body: Result<CommentResponse, String>,
) -> Result<Option<Comment>, ApiError> {
    let ok = is_success(status);
    let body = match body {
        Ok(body) => body,
        Err(e) if ok => return Err(ApiError::Decode(e)),
        Err(_) => return Err(rejected(None)),
    };
    if !ok || body.success != Some(true) {
        return Err(rejected(body.message));
    }
    Ok(body.comment)
}

/// Delete succeeds on any 2xx that does not explicitly say otherwise.
#[cfg(any(test, feature = "csr"))]
fn classify_delete(status: u16, body: Option<StatusResponse>) -> Result<(), ApiError> {
    let body = body.unwrap_or_default();
    if is_success(status) && body.success != Some(false) {
        Ok(())
    } else {
        Err(rejected(body.message))
    }
}

/// Lookup succeeds only with at least one candidate.
#[cfg(any(test, feature = "csr"))]
fn classify_nutrition(
    status: u16,
    body: Result<NutritionResponse, String>,
) -> Result<Vec<NutritionMatch>, ApiError> {
    if !is_success(status) {
        return Err(rejected(None));
    }
    let body = body.map_err(ApiError::Decode)?;
    if !body.success || body.data.is_empty() {
        return Err(rejected(None));
    }
    Ok(body.data)
}

#[cfg(any(test, feature = "csr"))]
fn classify_profile(status: u16, body: Result<ProfileResponse, String>) -> Result<Profile, ApiError> {
    if status == 401 {
        return Err(ApiError::Unauthorized);
    }
    if !is_success(status) {
        return Err(rejected(body.ok().and_then(|b| b.message)));
    }
    let body = body.map_err(ApiError::Decode)?;
    if !body.success {
        return Err(rejected(body.message));
    }
    Ok(body.profile.unwrap_or_default())
}

#[cfg(any(test, feature = "csr"))]
fn classify_profile_save(
    status: u16,
    body: Result<StatusResponse, String>,
) -> Result<(), ApiError> {
    if status == 401 {
        return Err(ApiError::Unauthorized);
    }
    let ok = is_success(status);
    let body = match body {
        Ok(body) => body,
        Err(e) if ok => return Err(ApiError::Decode(e)),
        Err(_) => return Err(rejected(None)),
    };
    if !ok || body.success != Some(true) {
        return Err(rejected(body.message));
    }
    Ok(())
}

/// Form posts answer with a redirect; the final URL is where to go next.
///
/// A response that was not redirected is a refusal, carrying the server's
/// `message` when the body has one.
#[cfg(any(test, feature = "csr"))]
fn classify_redirect(
    status: u16,
    redirected_to: Option<String>,
    body: Option<StatusResponse>,
) -> Result<String, ApiError> {
    if status == 401 {
        return Err(ApiError::Unauthorized);
    }
    if let Some(url) = redirected_to.filter(|u| !u.is_empty()) {
        return Ok(url);
    }
    Err(rejected(body.and_then(|b| b.message)))
}

// =============================================================
// Transport
// =============================================================

#[cfg(feature = "csr")]
async fn exchange<T: serde::de::DeserializeOwned>(
    request: Result<gloo_net::http::Request, gloo_net::Error>,
) -> Result<(u16, Result<T, String>), ApiError> {
    let request = request.map_err(|e| ApiError::Transport(e.to_string()))?;
    let resp = request
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let body = resp.json::<T>().await.map_err(|e| e.to_string());
    Ok((status, body))
}

/// Persist the viewer's saved flag for a recipe via `POST /api/recipe/{id}/save`.
///
/// Returns the `saved` flag the server confirmed, if it sent one.
///
/// # Errors
///
/// `Unauthorized` on `401`, `Rejected` when the server refuses, otherwise
/// `Transport`/`Decode`.
pub async fn toggle_save(recipe_id: u32, saved: bool) -> Result<Option<bool>, ApiError> {
    #[cfg(feature = "csr")]
    {
        use super::types::SaveRequest;
        let request =
            gloo_net::http::Request::post(&save_endpoint(recipe_id)).json(&SaveRequest { saved });
        let (status, body) = exchange::<SaveResponse>(request).await?;
        classify_save(status, body)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (recipe_id, saved);
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}

/// Submit a 1–5 rating via `POST /api/recipe/{id}/rate`.
///
/// # Errors
///
/// `AlreadyRated` on `409`, `Unauthorized` on `401`, `Rejected` otherwise.
pub async fn rate_recipe(recipe_id: u32, rating: u8) -> Result<RatingSummary, ApiError> {
    #[cfg(feature = "csr")]
    {
        use super::types::RateRequest;
        let request =
            gloo_net::http::Request::post(&rate_endpoint(recipe_id)).json(&RateRequest { rating });
        let (status, body) = exchange::<RateResponse>(request).await?;
        classify_rate(status, body)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (recipe_id, rating);
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}

/// Post a top-level comment or a reply via `POST /api/recipe/{id}/comments`.
///
/// # Errors
///
/// `Rejected` with the server's message when the comment is refused.
pub async fn post_comment(
    recipe_id: u32,
    content: String,
    parent_id: Option<u32>,
) -> Result<Comment, ApiError> {
    #[cfg(feature = "csr")]
    {
        use super::types::CommentRequest;
        let payload = CommentRequest { content, parent_id };
        let request = gloo_net::http::Request::post(&comments_endpoint(recipe_id)).json(&payload);
        let (status, body) = exchange::<CommentResponse>(request).await?;
        classify_comment_post(status, body)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (recipe_id, content, parent_id);
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}

/// Replace a comment's text via `POST /api/comment/{id}/edit`.
///
/// # Errors
///
/// `Rejected` with the server's message when the edit is refused.
pub async fn edit_comment(comment_id: u32, content: String) -> Result<Option<Comment>, ApiError> {
    #[cfg(feature = "csr")]
    {
        let payload = serde_json::json!({ "content": content });
        let request =
            gloo_net::http::Request::post(&edit_comment_endpoint(comment_id)).json(&payload);
        let (status, body) = exchange::<CommentResponse>(request).await?;
        classify_comment_edit(status, body)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (comment_id, content);
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}

/// Delete a comment and its replies.
///
/// Tries `DELETE /api/comment/{id}` first and falls back to
/// `POST /api/comment/{id}/delete`.
///
/// # Errors
///
/// The fallback's failure when both attempts fail.
pub async fn delete_comment(comment_id: u32) -> Result<(), ApiError> {
    #[cfg(feature = "csr")]
    {
        use gloo_net::http::Request;

        async fn attempt(request: Request) -> Result<(), ApiError> {
            let resp = request
                .send()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            let status = resp.status();
            classify_delete(status, resp.json::<StatusResponse>().await.ok())
        }

        let primary = Request::delete(&delete_comment_endpoint(comment_id))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        match attempt(primary).await {
            Ok(()) => Ok(()),
            Err(e) => {
                leptos::logging::warn!("DELETE comment {comment_id} failed ({e}); retrying via POST");
                let fallback = Request::post(&delete_comment_fallback_endpoint(comment_id))
                    .build()
                    .map_err(|e| ApiError::Transport(e.to_string()))?;
                attempt(fallback).await
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = comment_id;
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}

/// Look up per-gram nutrition candidates for one ingredient line.
///
/// # Errors
///
/// `Rejected` when the backend has no usable match.
pub async fn lookup_nutrition(ingredient: &str) -> Result<Vec<NutritionMatch>, ApiError> {
    #[cfg(feature = "csr")]
    {
        let request = gloo_net::http::Request::get(NUTRITION_ENDPOINT)
            .query([("ingredient", ingredient)])
            .build();
        let (status, body) = exchange::<NutritionResponse>(request).await?;
        classify_nutrition(status, body)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ingredient;
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}

/// Fetch the viewer's profile from `/api/get-profile`.
///
/// # Errors
///
/// `Unauthorized` on `401`, `Rejected` when the server reports failure.
pub async fn fetch_profile() -> Result<Profile, ApiError> {
    #[cfg(feature = "csr")]
    {
        let request = gloo_net::http::Request::get(PROFILE_ENDPOINT).build();
        let (status, body) = exchange::<ProfileResponse>(request).await?;
        classify_profile(status, body)
    }
    #[cfg(not(feature = "csr"))]
    {
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}

/// Save name, bio and an optional image as multipart via `/api/save-profile`.
///
/// # Errors
///
/// `Rejected` with the server's message when the save is refused.
#[cfg(feature = "csr")]
pub async fn save_profile(
    name: &str,
    bio: &str,
    image: Option<web_sys::File>,
) -> Result<(), ApiError> {
    let form = web_sys::FormData::new().map_err(|e| ApiError::Transport(format!("{e:?}")))?;
    let append = |key: &str, value: &str| {
        form.append_with_str(key, value)
            .map_err(|e| ApiError::Transport(format!("{e:?}")))
    };
    append("name", name)?;
    append("bio", bio)?;
    if let Some(file) = image {
        form.append_with_blob_and_filename("image", &file, &file.name())
            .map_err(|e| ApiError::Transport(format!("{e:?}")))?;
    }
    let request = gloo_net::http::Request::post(SAVE_PROFILE_ENDPOINT).body(form);
    let (status, body) = exchange::<StatusResponse>(request).await?;
    classify_profile_save(status, body)
}

#[cfg(feature = "csr")]
async fn follow_redirect(
    request: Result<gloo_net::http::Request, gloo_net::Error>,
) -> Result<String, ApiError> {
    let request = request.map_err(|e| ApiError::Transport(e.to_string()))?;
    let resp = request
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = resp.status();
    let redirected_to = resp.redirected().then(|| resp.url());
    let body = resp.json::<StatusResponse>().await.ok();
    classify_redirect(status, redirected_to, body)
}

/// Post the recipe form as multipart to `path` (the editor's own URL).
///
/// Returns the page the server redirected to: the recipe, or the profile's
/// drafts tab for drafts.
///
/// # Errors
///
/// `Rejected` with the server's message when it answers without a
/// redirect, `Transport` when the request never completes.
#[cfg(feature = "csr")]
pub async fn submit_recipe(path: &str, form: web_sys::FormData) -> Result<String, ApiError> {
    follow_redirect(gloo_net::http::Request::post(path).body(form)).await
}

/// Delete a recipe via `POST /recipe/{id}/delete`.
///
/// Returns the page the server redirected to.
///
/// # Errors
///
/// `Rejected` when the server answers without a redirect.
pub async fn delete_recipe(recipe_id: u32) -> Result<String, ApiError> {
    #[cfg(feature = "csr")]
    {
        let request = gloo_net::http::Request::post(&delete_recipe_endpoint(recipe_id)).build();
        follow_redirect(request).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = recipe_id;
        Err(ApiError::Transport(NOT_IN_BROWSER.to_owned()))
    }
}
