//! Utility helpers shared across client modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser concerns (storage, dialogs, card markup)
//! from sync and component logic to improve reuse and testability.

#[cfg(feature = "csr")]
pub mod cards;
pub mod dialog;
pub mod dom;
#[cfg(feature = "csr")]
pub mod recipe_form;
pub mod storage;
#[cfg(feature = "csr")]
pub mod tabs;
pub mod time;
