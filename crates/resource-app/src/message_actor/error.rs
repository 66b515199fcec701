//! Error types for the Message actor.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MessageError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Invalid user: {0}")]
    InvalidUser(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for MessageError {
    fn from(msg: String) -> Self {
        MessageError::ActorCommunicationError(msg)
    }
}
