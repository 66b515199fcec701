//! # Message Client
use crate::message_actor::MessageError;
use crate::model::{Message, UserId};
use async_trait::async_trait;
use resource_framework::{ActorClient, FrameworkError, Payload, ResourceClient, StoreAction};
use tracing::{debug, instrument};

/// Client for interacting with the Message actor.
#[derive(Clone)]
pub struct MessageClient {
    inner: ResourceClient<Message>,
}

impl MessageClient {
    pub fn new(inner: ResourceClient<Message>) -> Self {
        Self { inner }
    }

    /// Persists `text` as a message written by `author`.
    #[instrument(skip(self, text))]
    pub async fn send(&self, author: UserId, text: &str) -> Result<Message, MessageError> {
        debug!("Sending request");
        let input = Payload::new().with("message", text);
        let forced = Payload::new().with("user_id", author);
        self.inner
            .store(StoreAction::Create, input, forced)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Message> for MessageClient {
    type Error = MessageError;

    fn inner(&self) -> &ResourceClient<Message> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::EntityError(e) => match e.downcast::<MessageError>() {
                Ok(e) => *e,
                Err(e) => MessageError::ActorCommunicationError(e.to_string()),
            },
            e => MessageError::ActorCommunicationError(e.to_string()),
        }
    }
}
