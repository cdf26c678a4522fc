//! Service error taxonomy.

use thiserror::Error;

/// Failure classes surfaced by the service layer.
///
/// The web layer maps each variant to a status code: invalid input and
/// conflicts are client errors, missing profiles are not-found, and store
/// failures are server errors. No variant leaves partial state behind; a
/// request either persists completely or reports its error.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: a missing required field or a wrong
    /// shape. No state was mutated.
    #[error("{0}")]
    InvalidInput(String),

    /// The referenced profile does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A create collided with an existing profile.
    #[error("{0}")]
    Conflict(String),

    /// The persistence layer failed; the request was aborted.
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl ServiceError {
    /// Shorthand for an invalid-input error with a message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Shorthand for a not-found error with a message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Shorthand for a conflict error with a message.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
