//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the core component that manages the lifecycle
//! and state of entities. It implements the "Server" side of the Actor Model, processing
//! messages sequentially and ensuring exclusive access to the entity store.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// This struct is the "Server" half of the actor. It owns the state (`store`) and
/// the receiver end of the channel. Each actor processes its own messages *sequentially*
/// in a loop, so the `store` needs no `Mutex` or `RwLock`.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// #[derive(Clone, Debug)] struct MyEntity { id: u32 }
/// #[derive(Debug)] struct MyCreate;
/// #[derive(Debug)] struct MyUpdate;
/// #[derive(Debug, thiserror::Error)] #[error("my error")] struct MyError;
///
/// #[async_trait]
/// impl ActorEntity for MyEntity {
///     type Id = u32;
///     type Create = MyCreate;
///     type Update = MyUpdate;
///     type Context = ();
///     type Error = MyError;
///
///     fn from_create_params(id: u32, _: MyCreate) -> Result<Self, Self::Error> { Ok(Self { id }) }
///     async fn on_update(&mut self, _: MyUpdate, _: &()) -> Result<(), Self::Error> { Ok(()) }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let counter = AtomicU32::new(1);
///     let (actor, client) =
///         ResourceActor::<MyEntity>::new(10, move || counter.fetch_add(1, Ordering::SeqCst));
///     tokio::spawn(actor.run(()));
///     let id = client.create(MyCreate).await.unwrap();
///     assert_eq!(id, 1);
/// }
/// ```
///
/// # Operations
///
/// * **Create**: mints an ID with the generator, calls `T::from_create_params`, then the
///   `on_create` hook, then inserts into the `store`.
/// * **Get**: returns a clone of the entity if found, or `None`.
/// * **GetMany**: returns clones of the entities that exist, in request order. IDs that are
///   unknown (or repeated) are skipped.
/// * **Update**: calls `on_update` on the stored entity and returns the new state.
/// * **Delete**: calls `on_delete`, then removes the entity.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    /// * `next_id_fn` - Mints the ID for every created entity. Must never repeat.
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until the channel closes.
    ///
    /// # Context Injection
    /// The `context` argument is injected into every entity hook. This allows entities
    /// to access external dependencies (like other clients) that were created *after*
    /// the actor was instantiated but *before* the loop started.
    pub async fn run(mut self, context: T::Context) {
        // "Product" instead of "order_service::model::product::Product"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = (self.next_id_fn)();

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::GetMany { ids, respond_to } => {
                    let mut seen = std::collections::HashSet::with_capacity(ids.len());
                    let items: Vec<T> = ids
                        .iter()
                        .filter(|id| seen.insert(*id))
                        .filter_map(|id| self.store.get(id).cloned())
                        .collect();
                    debug!(entity_type, requested = ids.len(), found = items.len(), "GetMany");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    if let Some(item) = self.store.get_mut(&id) {
                        if let Err(e) = item.on_update(update, &context).await {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        info!(entity_type, %id, "Updated");
                        let _ = respond_to.send(Ok(item.clone()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    if let Some(item) = self.store.get(&id) {
                        if let Err(e) = item.on_delete(&context).await {
                            warn!(entity_type, %id, error = %e, "on_delete failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                            continue;
                        }
                        self.store.remove(&id);
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
