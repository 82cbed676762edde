//! # Clients
//!
//! Typed wrappers around [`ResourceClient`](actor_framework::ResourceClient) for each actor,
//! and the collaborator traits the order aggregator is written against.

pub mod account_client;
pub mod catalog_client;
pub mod traits;

pub use account_client::AccountClient;
pub use catalog_client::CatalogClient;
pub use traits::{AccountVerifier, ProductResolver};
