//! Networking: REST helpers and the DTOs they exchange with the backend.

pub mod api;
pub mod types;
