//! Star rating state.
//!
//! DESIGN
//! ======
//! `committed` is the last rating the server accepted (or rendered);
//! `current` is what the stars show outside of hover. A failed submit
//! restores `current` from `committed`. Once the viewer has rated, the
//! widget locks and ignores further clicks.

#[cfg(test)]
#[path = "rating_test.rs"]
mod rating_test;

use crate::error::ApiError;
use crate::net::api::RatingSummary;

/// Highest selectable star.
pub const MAX_STARS: u8 = 5;
/// Notice used when the server gives no reason for a failed rating.
pub const RATE_FAILED_MESSAGE: &str = "Could not submit rating.";

/// What the widget must do after a submit settles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RatingEffect {
    None,
    Redirect,
    Alert(String),
}

/// Rating widget model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatingState {
    pub current: u8,
    pub committed: u8,
    pub locked: bool,
    pub preview: Option<u8>,
    pub pending: bool,
    pub average: Option<f64>,
    pub count: Option<u32>,
}

fn clamp_stars(value: u8) -> u8 {
    value.min(MAX_STARS)
}

impl RatingState {
    /// Build from the host's `data-current`, `data-locked`, `data-avg` and
    /// `data-count` attributes. Unparseable values fall back to empty.
    #[must_use]
    pub fn from_attributes(
        current: Option<&str>,
        locked: Option<&str>,
        average: Option<&str>,
        count: Option<&str>,
    ) -> Self {
        let current = current
            .and_then(|v| v.trim().parse::<u8>().ok())
            .map_or(0, clamp_stars);
        Self {
            current,
            committed: current,
            locked: locked.is_some_and(|v| v.trim() == "true"),
            preview: None,
            pending: false,
            average: average
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite()),
            count: count.and_then(|v| v.trim().parse::<u32>().ok()),
        }
    }

    /// Stars lit right now, preview included.
    #[must_use]
    pub fn shown(&self) -> u8 {
        self.preview.unwrap_or(self.current)
    }

    /// `(active, preview)` classes for the 1-based star `value`.
    #[must_use]
    pub fn star_classes(&self, value: u8) -> (bool, bool) {
        let preview = self.preview.is_some_and(|n| value <= n);
        (value <= self.shown(), preview)
    }

    pub fn hover(&mut self, value: u8) {
        if !self.locked && (1..=MAX_STARS).contains(&value) {
            self.preview = Some(value);
        }
    }

    pub fn leave(&mut self) {
        if !self.locked {
            self.preview = None;
        }
    }

    /// Click on star `value`. Returns the rating to submit, or `None` when
    /// the click is ignored (out of range, locked, or already submitting).
    pub fn select(&mut self, value: u8) -> Option<u8> {
        if !(1..=MAX_STARS).contains(&value) {
            return None;
        }
        self.preview = None;
        if self.locked || self.pending {
            return None;
        }
        self.current = value;
        self.pending = true;
        Some(value)
    }

    /// Apply the server's answer to the last [`RatingState::select`].
    pub fn settle(&mut self, result: Result<RatingSummary, ApiError>) -> RatingEffect {
        self.pending = false;
        match result {
            Ok(summary) => {
                self.lock_at(self.current);
                if summary.average.is_some() {
                    self.average = summary.average;
                }
                if summary.count.is_some() {
                    self.count = summary.count;
                }
                RatingEffect::None
            }
            Err(ApiError::AlreadyRated { existing }) => {
                let value = if existing > 0 { clamp_stars(existing) } else { self.current };
                self.lock_at(value);
                RatingEffect::None
            }
            Err(ApiError::Unauthorized) => {
                self.current = self.committed;
                RatingEffect::Redirect
            }
            Err(e) => {
                leptos::logging::warn!("rating failed: {e}");
                self.current = self.committed;
                RatingEffect::Alert(e.user_message(RATE_FAILED_MESSAGE))
            }
        }
    }

    fn lock_at(&mut self, value: u8) {
        self.current = value;
        self.committed = value;
        self.locked = true;
        self.preview = None;
    }

    /// Average formatted with one decimal.
    #[must_use]
    pub fn average_display(&self) -> Option<String> {
        self.average.map(|avg| format!("{avg:.1}"))
    }
}
