//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract that every resource (Account, Product, …) must
//! implement to be managed by the generic `ResourceActor`. It specifies associated types for IDs,
//! DTOs, context, and errors, and provides lifecycle hooks (`on_create`, `on_update`, `on_delete`).
//!
//! # Architecture Note
//! By defining a contract (`ActorEntity`) that all our resource types must satisfy, we can write
//! the `ResourceActor` logic *once* and reuse it everywhere.
//!
//! We use "Associated Types" (type Id, type Create, etc.) to enforce type safety.
//! An `Account` entity requires an `AccountCreate` payload, and you can't accidentally send it
//! a `ProductCreate` payload.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! You do **not** need to implement these methods unless you want to customize behavior.
//! The default implementation does nothing (`Ok(())`).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// This trait is `#[async_trait]` to allow asynchronous operations in hooks (e.g., calling other actors).
/// It also defines a `Context` type, which is injected into every hook. This allows "Late Binding"
/// of dependencies (passing clients to `run()` instead of `new()`).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity (e.g., String, Uuid, u64).
    ///
    /// IDs are minted by the generator closure handed to
    /// [`ResourceActor::new`](crate::ResourceActor::new).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance (DTO - Data Transfer Object).
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per actor rather than one per message. Clients deal with a
    /// single `AccountError`/`ProductError` type and can recover it from
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError) by downcasting.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called immediately after the entity is created and initialized.
    /// Use this hook to perform validation or side effects (e.g., checking other actors).
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}
