//! # Account Actor
//!
//! Manages customer accounts. Orders only need to know whether an account exists, which
//! [`AccountClient`] answers through the [`AccountVerifier`](crate::clients::AccountVerifier)
//! trait.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Account`]
//! - [`error`] - [`AccountError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use order_service::account_actor;
//! use order_service::clients::AccountVerifier;
//! use order_service::model::AccountCreate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = account_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create_account(AccountCreate { name: "Alice".to_string() }).await?;
//!     client.verify(&id).await?;
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::AccountClient;
use crate::model::{Account, AccountId};
use actor_framework::ResourceActor;

/// Creates a new Account actor and its client. Account ids are ULID strings.
pub fn new(buffer_size: usize) -> (ResourceActor<Account>, AccountClient) {
    let next_account_id = || AccountId::new(ulid::Ulid::new().to_string());

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_account_id);
    let client = AccountClient::new(generic_client);

    (actor, client)
}
