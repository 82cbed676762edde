//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor systems. Each actor owns a collection of
//! one kind of resource and serves a fixed set of lifecycle requests over a Tokio channel:
//! the **Resource-Oriented Architecture (ROA)** pattern on top of the **Actor Model**.
//!
//! ## Why ROA + Actor Model?
//!
//! - **Uniform surface**: every resource speaks Create, Get, GetMany, Update and Delete.
//! - **Isolated state**: an actor's store is touched only by its own task, so there are no locks.
//! - **Loose coupling**: resources that need each other talk through clients injected at
//!   start-up, never through shared memory.
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model)
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - Your domain model and its lifecycle hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - Message processing and ownership of state
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - Type-safe communication
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! #[derive(Clone, Debug)]
//! struct Shelf {
//!     id: String,
//!     label: String,
//! }
//!
//! #[derive(Debug)] struct ShelfCreate { label: String }
//! #[derive(Debug)] struct ShelfUpdate { label: Option<String> }
//! #[derive(Debug, thiserror::Error)] #[error("{0}")] struct ShelfError(String);
//!
//! #[async_trait]
//! impl ActorEntity for Shelf {
//!     type Id = String;
//!     type Create = ShelfCreate;
//!     type Update = ShelfUpdate;
//!     type Context = ();
//!     type Error = ShelfError;
//!
//!     fn from_create_params(id: String, params: ShelfCreate) -> Result<Self, Self::Error> {
//!         if params.label.is_empty() {
//!             return Err(ShelfError("label is empty".into()));
//!         }
//!         Ok(Self { id, label: params.label })
//!     }
//!
//!     async fn on_update(&mut self, update: ShelfUpdate, _ctx: &()) -> Result<(), Self::Error> {
//!         if let Some(label) = update.label { self.label = label; }
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let next = AtomicU64::new(1);
//!     let (actor, client) = ResourceActor::<Shelf>::new(10, move || {
//!         format!("shelf_{}", next.fetch_add(1, Ordering::SeqCst))
//!     });
//!     tokio::spawn(actor.run(()));
//!
//!     let a = client.create(ShelfCreate { label: "A".into() }).await.unwrap();
//!     let b = client.create(ShelfCreate { label: "B".into() }).await.unwrap();
//!
//!     // Unknown IDs are simply left out of a batch read.
//!     let found = client.get_many(vec![b.clone(), "shelf_99".into(), a]).await.unwrap();
//!     let labels: Vec<_> = found.iter().map(|s| s.label.as_str()).collect();
//!     assert_eq!(labels, ["B", "A"]);
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** through `run(context)`, not at construction time.
//! All actors can be created first, and their clients handed to whichever actors need them
//! when the run loops are spawned. See `OrderSystem` in the order-service crate.
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor
//! - Different actors run in **parallel**
//!
//! ## Testing
//!
//! The [`mock`] module provides [`mock::MockClient`], which hands out a real
//! [`ResourceClient`] backed by scripted replies, plus channel-level helpers for tests that
//! want to play the actor themselves.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
