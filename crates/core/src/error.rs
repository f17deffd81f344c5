//! Errors raised by menu, cart and inquiry rules.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A rule of the menu or cart was broken.
///
/// Only deterministic failures live here: a bad price, a sixth variant, a
/// cart command for another session. Network and storage trouble is reported
/// by the store error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input the customer or admin can correct (blank title, negative price).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A state the cart must never reach, such as an unrepresentable total.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// No menu item or variant by that id or name.
    #[error("not found")]
    NotFound,

    /// A name is already taken (variant, category).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
