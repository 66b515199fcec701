//! [`ResourceEntity`] implementation for [`Message`].

use crate::clients::UserClient;
use crate::message_actor::MessageError;
use crate::model::{Message, MessageId};
use async_trait::async_trait;
use resource_framework::{ActorClient, ResourceEntity};

#[async_trait]
impl ResourceEntity for Message {
    type Id = MessageId;
    type Context = UserClient;
    type Error = MessageError;

    fn id(&self) -> MessageId {
        self.id
    }

    fn new_record(id: MessageId) -> Self {
        Message::blank(id)
    }

    async fn on_create(&mut self, users: &UserClient) -> Result<(), MessageError> {
        if self.message.trim().is_empty() {
            return Err(MessageError::EmptyMessage);
        }
        match users.find(self.user_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(MessageError::InvalidUser(self.user_id.to_string())),
            Err(e) => Err(MessageError::ActorCommunicationError(e.to_string())),
        }
    }
}
