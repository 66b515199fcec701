//! # Chat
//!
//! Stores chat messages through the message actor and pushes each new one to everybody else
//! connected to the private `chat` channel.

pub mod broadcast;

pub use broadcast::{Broadcaster, Envelope, MessageSent, SocketId, Subscription, CHAT_CHANNEL};

use crate::clients::{MessageClient, UserClient};
use crate::message_actor::MessageError;
use crate::model::{Message, User, UserId};
use crate::user_actor::UserError;
use resource_framework::ActorClient;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, instrument};

pub const CHAT_VIEW: &str = "chat";

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Message(#[from] MessageError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),
    #[error("User {0} may not join the chat")]
    Unauthorized(UserId),
}

#[derive(Clone)]
pub struct ChatService {
    messages: MessageClient,
    users: UserClient,
    broadcaster: Broadcaster,
}

impl ChatService {
    pub fn new(messages: MessageClient, users: UserClient, broadcaster: Broadcaster) -> Self {
        Self {
            messages,
            users,
            broadcaster,
        }
    }

    /// Name of the chat page.
    pub fn index(&self) -> &'static str {
        CHAT_VIEW
    }

    pub fn subscribe(&self, user: &User, channel: &str) -> Result<Subscription, ChatError> {
        self.broadcaster.subscribe(user, channel)
    }

    /// Every message in the order it was written, each with its author attached.
    #[instrument(skip(self))]
    pub async fn fetch_messages(&self) -> Result<Vec<Message>, ChatError> {
        let messages = self.messages.all().await?;
        let users: HashMap<UserId, User> = self
            .users
            .all()
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        Ok(messages
            .into_iter()
            .map(|message| match users.get(&message.user_id) {
                Some(user) => message.with_user(user.clone()),
                None => message,
            })
            .collect())
    }

    /// Stores `text` as a message from `user`, then tells every other socket about it.
    ///
    /// `socket` is the author's own connection, which does not get the event.
    #[instrument(skip(self, user, text), fields(user_id = %user.id))]
    pub async fn send_message(
        &self,
        user: &User,
        text: &str,
        socket: Option<SocketId>,
    ) -> Result<Message, ChatError> {
        let message = self.messages.send(user.id, text).await?;

        let receivers = self.broadcaster.publish(
            MessageSent {
                user: user.clone(),
                message: message.clone(),
            },
            socket,
        );
        info!(message_id = %message.id, receivers, "Message sent");
        Ok(message)
    }
}
