use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A customer account.
///
/// # Actor Framework
/// Implements [`ActorEntity`](actor_framework::ActorEntity) in
/// [`account_actor::entity`](crate::account_actor::entity); the order aggregator only ever
/// asks whether an account exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
}

/// Payload for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCreate {
    pub name: String,
}

/// Payload for renaming an existing account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub name: String,
}
