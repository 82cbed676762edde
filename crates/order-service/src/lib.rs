//! # Order Service
//!
//! Order placement and retrieval on top of the actor framework.
//!
//! - **[account_actor]** / **[catalog_actor]**: in-process collaborators built on
//!   [`ResourceActor`](actor_framework::ResourceActor).
//! - **[clients]**: typed clients for those actors, and the [`AccountVerifier`](clients::AccountVerifier)
//!   and [`ProductResolver`](clients::ProductResolver) traits the aggregator depends on.
//! - **[store]**: atomic order persistence and sorted row retrieval (PostgreSQL or in-memory),
//!   plus the fold that turns rows back into orders.
//! - **[order_service]**: [`OrderService`](order_service::OrderService), placement and
//!   enriched retrieval.
//! - **[context]**: per-request cancellation and deadline.
//! - **[lifecycle]**: configuration, tracing and the [`OrderSystem`](lifecycle::OrderSystem) wiring.

pub mod account_actor;
pub mod catalog_actor;
pub mod clients;
pub mod context;
pub mod lifecycle;
pub mod model;
pub mod order_service;
pub mod store;
