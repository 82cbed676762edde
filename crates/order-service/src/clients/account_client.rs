//! # Account Client
//!
//! Provides a high‑level API for interacting with the `Account` actor.
use super::AccountVerifier;
use crate::account_actor::AccountError;
use crate::model::{Account, AccountCreate, AccountId, AccountUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Account actor.
#[derive(Clone)]
pub struct AccountClient {
    inner: ResourceClient<Account>,
}

impl AccountClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Account> for AccountClient {
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<AccountError>() {
            Ok(entity_error) => entity_error,
            Err(FrameworkError::NotFound(id)) => AccountError::NotFound(id),
            Err(other) => AccountError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl AccountClient {
    #[instrument(skip(self))]
    pub async fn create_account(&self, params: AccountCreate) -> Result<AccountId, AccountError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn rename_account(
        &self,
        id: AccountId,
        name: String,
    ) -> Result<Account, AccountError> {
        debug!("Sending request");
        let update = AccountUpdate { name };
        self.inner.update(id, update).await.map_err(Self::map_error)
    }
}

#[async_trait]
impl AccountVerifier for AccountClient {
    #[instrument(skip(self, account_id), fields(%account_id))]
    async fn verify(&self, account_id: &AccountId) -> Result<(), AccountError> {
        match self.get(account_id.clone()).await? {
            Some(_) => Ok(()),
            None => Err(AccountError::NotFound(account_id.to_string())),
        }
    }
}
