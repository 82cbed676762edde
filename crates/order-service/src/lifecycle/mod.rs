//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and shutting down the order system.
//!
//! ## The OrderSystem Pattern
//!
//! Collaborator actors are created first, then started, then their clients are handed to
//! the aggregator behind its traits:
//!
//! ```rust,ignore
//! let (account_actor, account_client) = account_actor::new(buffer);
//! let (catalog_actor, catalog_client) = catalog_actor::new(buffer);
//! let (store_actor, store) = store::memory::new(buffer);
//!
//! let handles = vec![
//!     tokio::spawn(account_actor.run(())),
//!     tokio::spawn(catalog_actor.run(())),
//!     tokio::spawn(store_actor.run()),
//! ];
//!
//! let order_service = OrderService::new(
//!     Arc::new(account_client.clone()),
//!     Arc::new(catalog_client.clone()),
//!     Arc::new(store),
//! );
//! ```
//!
//! With a `database_url` configured, [`OrderSystem::connect`] uses
//! [`PgOrderStore`](crate::store::PgOrderStore) instead of the store actor.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - including the clones held by the `OrderService`
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - every actor task is joined
//!
//! The dependency graph is acyclic (actors never hold each other's clients), so channel
//! closure is enough to stop everything.
//!
//! ## Configuration
//!
//! [`ServiceConfig::load`] reads an optional YAML file and applies `DATABASE_URL`,
//! `ORDER_DB_MAX_CONNECTIONS` and `ORDER_REQUEST_TIMEOUT_MS` on top.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the `tracing` subscriber; see [`telemetry`].

pub mod config;
pub mod order_system;
pub mod telemetry;

pub use config::*;
pub use order_system::*;
pub use telemetry::*;
