//! # Catalog Actor
//!
//! Manages the product catalog: names, descriptions and current prices. The order
//! aggregator reads it through [`CatalogClient`], which batches every lookup of a request
//! into a single `GetMany` round trip.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use order_service::catalog_actor;
//! use order_service::clients::ProductResolver;
//! use order_service::model::ProductCreate;
//! use rust_decimal::Decimal;
//! use std::collections::BTreeSet;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = catalog_actor::new(32);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .create_product(ProductCreate {
//!             name: "Widget".to_string(),
//!             description: "A widget".to_string(),
//!             price: Decimal::new(2999, 2),
//!         })
//!         .await?;
//!
//!     let resolved = client.resolve_batch(&BTreeSet::from([id.clone()])).await?;
//!     assert_eq!(resolved[&id].unit_price, Decimal::new(2999, 2));
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CatalogClient;
use crate::model::{Product, ProductId};
use actor_framework::ResourceActor;

/// Creates a new Catalog actor and its client. Product ids are ULID strings.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, CatalogClient) {
    let next_product_id = || ProductId::new(ulid::Ulid::new().to_string());

    let (actor, generic_client) = ResourceActor::new(buffer_size, next_product_id);
    let client = CatalogClient::new(generic_client);

    (actor, client)
}
