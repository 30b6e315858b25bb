//! Error types shared by the API layer and the sync engine.
//!
//! ERROR HANDLING
//! ==============
//! Every failure is terminal for the operation that triggered it. Callers
//! map `ApiError` to a user-visible notice with [`ApiError::user_message`];
//! `Unauthorized` is the one variant that navigates instead.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure of a request against the recipe backend.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The server answered `401`; the session is gone.
    #[error("unauthorized")]
    Unauthorized,
    /// The exchange completed but the server refused the change.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The server answered `409` for a rating that already exists.
    #[error("already rated ({existing})")]
    AlreadyRated { existing: u8 },
    /// Network failure before any response arrived.
    #[error("transport failed: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text to show the user for this failure.
    ///
    /// Only `Rejected` carries a server-provided message; every other
    /// variant falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected(msg) if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_owned(),
        }
    }
}

/// Failure writing to the browser's key-value storage (quota, privacy mode).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
}
