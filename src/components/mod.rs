//! Leptos components mounted onto server-rendered host elements.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each component owns one host (`#ratingWidget`, `#comments`,
//! `#nutritionEstimator`, `#stepEditor`, `#tag-container`, `#profileEditor`)
//! and reads its initial data from that host's attributes or children.
//! `mount` decides which of them a page gets.

pub mod comment_thread;
pub mod nutrition_panel;
pub mod profile_editor;
pub mod rating_widget;
pub mod step_editor;
pub mod tag_picker;
