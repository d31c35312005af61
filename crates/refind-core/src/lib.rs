//! # refind-core
//!
//! Core types, traits, and abstractions for the refind lost-and-found
//! marketplace backend.
//!
//! This crate provides the foundational data structures, the item status
//! lifecycle rules, and the trait definitions that other refind crates
//! depend on.

pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use lifecycle::{
    allowed_next_statuses, can_transition, is_valid_status, status_description,
    validate_status_transition, validate_status_transition_str, TransitionError, VALID_STATUSES,
};
pub use models::*;
pub use traits::*;
