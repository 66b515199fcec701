//! # Generic Messages
//!
//! The message types exchanged between a `ResourceClient` and its `ResourceActor`.

use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::schema::{ModifyAction, Payload};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Whether a `store` inserts a new row or mass-assigns onto an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction<Id> {
    Create,
    Update(Id),
}

/// Internal message type sent to the actor to request operations.
///
/// The lifecycle is deliberately small: resources are written only through `Store` (fillable
/// input) and `Modify` (status toggles, soft delete, image clearing). There is no hard delete.
#[derive(Debug)]
pub enum ResourceRequest<T: ResourceEntity> {
    Store {
        action: StoreAction<T::Id>,
        /// Untrusted input. Only fillable fields are taken from it.
        input: Payload,
        /// Trusted values set by the application (owner ids, roles), bypassing the fillable list.
        forced: Payload,
        respond_to: Response<T>,
    },
    Find {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    All {
        respond_to: Response<Vec<T>>,
    },
    Modify {
        id: T::Id,
        action: ModifyAction,
        attribute: Option<String>,
        respond_to: Response<T>,
    },
}
