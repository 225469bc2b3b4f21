//! Submission lifecycle for the advice form.
//!
//! `state` holds the four-field record and its pure transitions; `controller`
//! owns the record behind a lock and drives the fetch lifecycle.

pub mod controller;
pub mod state;

pub use controller::*;
pub use state::*;

/// Errors from controller operations.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    #[error("Internal lock error")]
    LockPoisoned,
}
