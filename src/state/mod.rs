//! Client-side state models.
//!
//! DESIGN
//! ======
//! State is split by feature (`save`, `rating`, `comments`, `nutrition`,
//! `recipe_form`, `profile`). Each module is plain data plus transitions so it can be
//! tested natively; components wrap these in signals.

pub mod comments;
pub mod nutrition;
pub mod profile;
pub mod rating;
pub mod recipe_form;
pub mod save;
