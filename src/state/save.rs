//! Per-control save state.
//!
//! DESIGN
//! ======
//! Each save chip owns exactly one `ChipState`. Class names, the ARIA
//! attributes, the label text and the disabled flag are all derived from it
//! through [`ChipPaint`], so the visual state can never drift from the
//! logical one.
//!
//! Two controls count as chips: `.save-chip` on cards and the recipe
//! page's `#saveBtn`.

#[cfg(test)]
#[path = "save_test.rs"]
mod save_test;

use serde::{Deserialize, Serialize};

/// Label shown on a chip whose recipe is saved.
pub const SAVED_LABEL: &str = "Saved";
/// Label shown on a chip whose recipe is not saved.
pub const UNSAVED_LABEL: &str = "Save";
/// Selector matching every save control: card chips and the detail-page button.
pub const CHIP_SELECTOR: &str = ".save-chip, #saveBtn";

/// Selector matching the controls bound to one recipe, including the
/// deprecated `data-id` alias.
#[must_use]
pub fn chip_selector_for(recipe_id: u32) -> String {
    ["data-recipe-id", "data-id"]
        .iter()
        .flat_map(|attr| {
            [".save-chip", "#saveBtn"]
                .into_iter()
                .map(move |base| format!("{base}[{attr}=\"{recipe_id}\"]"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Message used when the server gives no reason for a failed toggle.
pub const SAVE_FAILED_MESSAGE: &str = "Could not update save.";

/// Lifecycle of a single save chip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChipState {
    #[default]
    Unsaved,
    Saved,
    /// A toggle request is in flight. `was_saved` is what the chip keeps
    /// showing and what it falls back to on failure.
    Pending { was_saved: bool },
}

impl ChipState {
    #[must_use]
    pub fn from_saved(saved: bool) -> Self {
        if saved { Self::Saved } else { Self::Unsaved }
    }

    /// The saved flag currently displayed.
    #[must_use]
    pub fn is_saved(self) -> bool {
        match self {
            Self::Saved => true,
            Self::Unsaved => false,
            Self::Pending { was_saved } => was_saved,
        }
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// User activation. Returns the pending state and the intended value,
    /// or `None` while a request is already in flight.
    #[must_use]
    pub fn activate(self) -> Option<(Self, bool)> {
        match self {
            Self::Pending { .. } => None,
            settled => {
                let was_saved = settled.is_saved();
                Some((Self::Pending { was_saved }, !was_saved))
            }
        }
    }

    /// Server confirmed `saved`.
    #[must_use]
    pub fn succeed(self, saved: bool) -> Self {
        Self::from_saved(saved)
    }

    /// Request failed; restore whatever was displayed before activation.
    #[must_use]
    pub fn fail(self) -> Self {
        Self::from_saved(self.is_saved())
    }

    /// A change relayed from another control or tab.
    ///
    /// Settled chips flip directly. A pending chip keeps its request but
    /// adopts the relayed value as the state to restore on failure.
    #[must_use]
    pub fn external(self, saved: bool) -> Self {
        match self {
            Self::Pending { .. } => Self::Pending { was_saved: saved },
            _ => Self::from_saved(saved),
        }
    }

    /// Label text for the chip's `.label` child.
    #[must_use]
    pub fn label(self) -> &'static str {
        if self.is_saved() { SAVED_LABEL } else { UNSAVED_LABEL }
    }

    /// Everything a control displays for this state.
    #[must_use]
    pub fn paint(self) -> ChipPaint {
        let saved = self.is_saved();
        ChipPaint {
            state_attr: self.as_attr(),
            saved,
            aria_pressed: if saved { "true" } else { "false" },
            label: self.label(),
            busy: self.is_pending(),
        }
    }

    /// Serialized form stored on the element (`data-save-state`).
    #[must_use]
    pub fn as_attr(self) -> &'static str {
        match self {
            Self::Unsaved => "unsaved",
            Self::Saved => "saved",
            Self::Pending { was_saved: false } => "pending-unsaved",
            Self::Pending { was_saved: true } => "pending-saved",
        }
    }

    /// Inverse of [`ChipState::as_attr`].
    #[must_use]
    pub fn from_attr(raw: &str) -> Option<Self> {
        match raw {
            "unsaved" => Some(Self::Unsaved),
            "saved" => Some(Self::Saved),
            "pending-unsaved" => Some(Self::Pending { was_saved: false }),
            "pending-saved" => Some(Self::Pending { was_saved: true }),
            _ => None,
        }
    }
}

/// Attribute values for a painted chip.
///
/// `label` goes both to the `.label` child and to `aria-label`; `busy`
/// drives `disabled` and `aria-busy`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChipPaint {
    pub state_attr: &'static str,
    /// Whether the `is-saved` class is present.
    pub saved: bool,
    pub aria_pressed: &'static str,
    pub label: &'static str,
    pub busy: bool,
}

/// Saved flag as rendered by the server into a chip's markup.
///
/// Any one of the three markers counts.
#[must_use]
pub fn markup_saved(data_saved: Option<&str>, aria_pressed: Option<&str>, has_saved_class: bool) -> bool {
    data_saved == Some("true") || aria_pressed == Some("true") || has_saved_class
}

/// Last confirmed save state for one recipe, as kept in the cache.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub saved: bool,
    /// Milliseconds since the Unix epoch; advisory only.
    #[serde(default)]
    pub t: f64,
}
