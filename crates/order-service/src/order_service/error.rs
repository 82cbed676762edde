//! Error types for the order aggregator.

use crate::context::Cancelled;
use crate::model::AccountId;
use crate::store::StoreError;
use thiserror::Error;

/// Errors returned by [`OrderService`](super::OrderService) operations.
///
/// A placement either returns a complete priced order or exactly one of these.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request was malformed. Nothing downstream was called.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The account collaborator says the account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// The account collaborator could not be reached.
    #[error("Account service unavailable: {0}")]
    AccountUnavailable(String),

    /// The catalog could not be reached.
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// None of the requested products resolved, so there is nothing to order.
    #[error("No valid products in order")]
    NoValidProducts,

    #[error("Failed to persist order: {0}")]
    PersistenceFailed(#[source] StoreError),

    #[error("Failed to retrieve orders: {0}")]
    RetrievalFailed(#[source] StoreError),

    /// The request was cancelled or ran past its deadline.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<Cancelled> for OrderError {
    fn from(_: Cancelled) -> Self {
        OrderError::Cancelled
    }
}
