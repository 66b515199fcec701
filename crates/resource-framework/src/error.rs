//! # Framework Errors
//!
//! Common error types used by every actor and client. Domain crates wrap these in their own
//! per-resource enums through [`ActorClient::map_error`](crate::ActorClient::map_error).

use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Errors that can occur within the resource framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] StorageError),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}
