//! # User Actor
//!
//! Manages registered users. The user actor has no dependencies (`Context = ()`); posts and
//! messages depend on it to validate their owners.
//!
//! ## Structure
//!
//! - [`entity`] - [`ResourceEntity`](resource_framework::ResourceEntity) implementation for [`User`]
//! - [`error`] - [`UserError`] type for type-safe error handling
//! - [`new()`] - Factory function that creates the actor and client

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserClient;
use crate::config::AppConfig;
use crate::model::User;
use resource_framework::ResourceActor;

/// Creates a new User actor and its client.
pub fn new(config: &AppConfig) -> (ResourceActor<User>, UserClient) {
    let (actor, generic_client) = ResourceActor::new(config.actor_buffer, User::schema());
    let actor = actor.transaction_attempts(config.transaction_attempts);
    (actor, UserClient::new(generic_client))
}
