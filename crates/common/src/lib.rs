//! Shared identifier types for the storefront backend.

pub mod types;

pub use types::{ProductId, UserKey};
