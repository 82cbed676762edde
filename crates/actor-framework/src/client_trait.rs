//! # ActorClient Trait
//!
//! Provides a common interface for resource‑specific clients, adding default `get`, `get_many`
//! and `delete` methods built on top of a generic `ResourceClient`.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read and delete operations.
///
/// # Example
///
/// ```rust
/// use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// // 1. Define Entity
/// #[derive(Clone, Debug)]
/// struct Widget { id: u32 }
/// #[derive(Debug)] struct WidgetCreate;
/// #[derive(Debug)] struct WidgetUpdate;
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("{0}")]
/// struct WidgetError(String);
///
/// impl From<String> for WidgetError {
///     fn from(s: String) -> Self { WidgetError(s) }
/// }
///
/// #[async_trait]
/// impl ActorEntity for Widget {
///     type Id = u32;
///     type Create = WidgetCreate;
///     type Update = WidgetUpdate;
///     type Context = ();
///     type Error = WidgetError;
///
///     fn from_create_params(id: u32, _: WidgetCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id })
///     }
///     async fn on_update(&mut self, _: WidgetUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// // 2. Define Client Wrapper
/// struct WidgetClient {
///     inner: ResourceClient<Widget>,
/// }
///
/// // 3. Implement ActorClient
/// #[async_trait]
/// impl ActorClient<Widget> for WidgetClient {
///     type Error = WidgetError;
///
///     fn inner(&self) -> &ResourceClient<Widget> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         WidgetError(e.to_string())
///     }
/// }
///
/// // 4. Usage
/// async fn usage(client: WidgetClient) {
///     // get(), get_many() and delete() are provided automatically
///     let _ = client.get(1).await;
///     let _ = client.get_many(vec![1, 2]).await;
///     let _ = client.delete(1).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every entity that exists among `ids`. Missing IDs are omitted.
    #[tracing::instrument(skip(self, ids), fields(count = ids.len()))]
    async fn get_many(&self, ids: Vec<T::Id>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get_many(ids).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
