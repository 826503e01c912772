//! The module contains the errors the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when input rejected at the boundary is malformed.
//! - [`Integrity`] thrown when validated data violates an internal invariant.
//! - [`InvalidState`] thrown on a transition out of a terminal request state.
//! - [`NotFound`] thrown when an item is not found.
//! - [`Conflict`] thrown when a stale write loses an optimistic check.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Integrity`]: EngineError::Integrity
//!  [`InvalidState`]: EngineError::InvalidState
//!  [`NotFound`]: EngineError::NotFound
//!  [`Conflict`]: EngineError::Conflict
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Integrity violation: {0}")]
    Integrity(String),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Stale update: {0}")]
    Conflict(String),
}
