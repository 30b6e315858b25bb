//! Save-state synchronization across chips, navigations and tabs.
//!
//! SYSTEM CONTEXT
//! ==============
//! `cache` persists the last confirmed state per recipe, `channel` carries
//! confirmed changes to the page and to sibling tabs, and `engine` ties them
//! to the chips on the page. `browser` binds all three to `web-sys`.

#[cfg(feature = "csr")]
pub mod browser;
pub mod cache;
pub mod channel;
pub mod engine;

#[cfg(test)]
mod testing;
