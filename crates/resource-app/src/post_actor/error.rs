//! Error types for the Post actor.

use thiserror::Error;

/// Errors that can occur during post operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PostError {
    #[error("Post not found: {0}")]
    NotFound(String),

    /// The owner of the post does not exist.
    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("Post validation error: {0}")]
    ValidationError(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for PostError {
    fn from(msg: String) -> Self {
        PostError::ActorCommunicationError(msg)
    }
}
