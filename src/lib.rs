//! # recipe-client
//!
//! Leptos + WASM interactivity layer for the server-rendered recipe site.
//!
//! The backend renders every page; this crate attaches behavior to that
//! markup: save chips kept in sync across tabs, the star rating widget,
//! threaded comments, the profile editor, and live nutrition estimates on
//! the recipe form.
//!
//! Pure state and sync logic compile natively and are tested without a
//! browser. Everything that touches `web-sys` sits behind the `csr` feature.

pub mod components;
pub mod config;
pub mod error;
pub mod mount;
pub mod net;
pub mod state;
pub mod sync;
pub mod util;
