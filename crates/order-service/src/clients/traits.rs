//! # Collaborator Seams
//!
//! The order aggregator depends on these traits only. The in-process actor clients implement
//! them, and tests substitute their own.

use crate::account_actor::AccountError;
use crate::catalog_actor::ProductError;
use crate::model::{AccountId, ProductDetails, ProductId};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

/// Confirms that an account exists.
#[async_trait]
pub trait AccountVerifier: Send + Sync {
    /// `Ok(())` if the account exists, [`AccountError::NotFound`] if it does not, any other
    /// variant if the collaborator could not be reached.
    async fn verify(&self, account_id: &AccountId) -> Result<(), AccountError>;
}

/// Looks up live product data in batches.
#[async_trait]
pub trait ProductResolver: Send + Sync {
    /// Resolves every id it can in a single call. Ids the catalog does not know are
    /// absent from the returned map; that is not an error.
    async fn resolve_batch(
        &self,
        ids: &BTreeSet<ProductId>,
    ) -> Result<HashMap<ProductId, ProductDetails>, ProductError>;
}
