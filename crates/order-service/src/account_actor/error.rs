//! Error types for the Account actor.

use thiserror::Error;

/// Errors that can occur during account operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccountError {
    /// The requested account does not exist.
    #[error("Account not found: {0}")]
    NotFound(String),

    /// The account data provided is invalid.
    #[error("Account validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for AccountError {
    fn from(msg: String) -> Self {
        AccountError::ActorCommunicationError(msg)
    }
}
