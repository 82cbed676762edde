//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # Resource-Oriented Architecture
/// Each actor manages a specific type of resource (the [`ActorEntity`]). Instead of defining
/// ad-hoc messages for every operation, we standardize around a set of lifecycle operations
/// that apply to almost any persistent resource.
///
/// - **Create**: Lifecycle start. Uses [`ActorEntity::Create`] to initialize a new resource.
/// - **Get (Read)**: Fetches the current state of one resource by ID.
/// - **GetMany (Batch Read)**: Fetches every listed resource that exists in one round trip.
///   Unknown IDs are omitted from the reply rather than reported as errors.
/// - **Update**: State mutation. Uses [`ActorEntity::Update`] to modify an existing resource.
/// - **Delete**: Lifecycle end. Removes the resource.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    GetMany {
        ids: Vec<T::Id>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
