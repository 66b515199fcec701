//! # Post Actor
//!
//! Manages posts. Depends on the user actor: a post can only be created for a user that
//! exists, which is checked in [`Post::on_create`](resource_framework::ResourceEntity::on_create).
//!
//! ```rust,ignore
//! let (user_actor, user_client) = user_actor::new(&config);
//! let (post_actor, post_client) = post_actor::new(&config);
//!
//! tokio::spawn(user_actor.run(()));
//! tokio::spawn(post_actor.run(user_client.clone()));
//!
//! let post = post_client.create_post(author.id, input).await?;
//! post_client.modify(post.id, ModifyAction::Hide, None).await?;
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::PostClient;
use crate::config::AppConfig;
use crate::model::Post;
use resource_framework::ResourceActor;

/// Creates a new Post actor and its client. Run it with a `UserClient` as context.
pub fn new(config: &AppConfig) -> (ResourceActor<Post>, PostClient) {
    let (actor, generic_client) = ResourceActor::new(config.actor_buffer, Post::schema());
    let actor = actor.transaction_attempts(config.transaction_attempts);
    (actor, PostClient::new(generic_client))
}
