//! # Message Actor
//!
//! Persists chat messages. Like posts, a message needs an existing author, so the actor runs
//! with a `UserClient` as its context.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::MessageClient;
use crate::config::AppConfig;
use crate::model::Message;
use resource_framework::ResourceActor;

/// Creates a new Message actor and its client. Run it with a `UserClient` as context.
pub fn new(config: &AppConfig) -> (ResourceActor<Message>, MessageClient) {
    let (actor, generic_client) = ResourceActor::new(config.actor_buffer, Message::schema());
    let actor = actor.transaction_attempts(config.transaction_attempts);
    (actor, MessageClient::new(generic_client))
}
