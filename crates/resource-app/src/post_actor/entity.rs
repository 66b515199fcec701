//! [`ResourceEntity`] implementation for [`Post`].

use crate::clients::UserClient;
use crate::model::{Post, PostId};
use crate::post_actor::PostError;
use async_trait::async_trait;
use resource_framework::{ActorClient, ResourceEntity};
use tracing::debug;

#[async_trait]
impl ResourceEntity for Post {
    type Id = PostId;
    type Context = UserClient;
    type Error = PostError;

    fn id(&self) -> PostId {
        self.id
    }

    fn new_record(id: PostId) -> Self {
        Post::blank(id)
    }

    /// Validates the title and the owner before the post is inserted.
    async fn on_create(&mut self, users: &UserClient) -> Result<(), PostError> {
        if self.title.trim().is_empty() {
            return Err(PostError::ValidationError("title is required".into()));
        }

        debug!(user_id = %self.user_id, "Validating post owner");
        match users.find(self.user_id).await {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(PostError::InvalidUser(self.user_id.to_string())),
            Err(e) => Err(PostError::ActorCommunicationError(e.to_string())),
        }
    }
}
