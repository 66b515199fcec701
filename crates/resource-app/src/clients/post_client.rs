//! # Post Client
//!
//! Provides a high-level API for interacting with the `Post` actor.
use crate::model::{Post, PostId, UserId};
use crate::post_actor::PostError;
use async_trait::async_trait;
use resource_framework::{ActorClient, FrameworkError, Payload, ResourceClient, StoreAction};
use tracing::{debug, instrument};

/// Client for interacting with the Post actor.
///
/// Owner validation happens in the Post actor's `on_create` hook.
#[derive(Clone)]
pub struct PostClient {
    inner: ResourceClient<Post>,
}

impl PostClient {
    pub fn new(inner: ResourceClient<Post>) -> Self {
        Self { inner }
    }

    /// Creates a post owned by `owner` from the fillable fields of `input`.
    #[instrument(skip(self, input))]
    pub async fn create_post(&self, owner: UserId, input: Payload) -> Result<Post, PostError> {
        debug!("Sending request");
        self.inner
            .store(StoreAction::Create, input, Payload::new().with("user_id", owner))
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, input))]
    pub async fn update_post(&self, id: PostId, input: Payload) -> Result<Post, PostError> {
        debug!("Sending request");
        self.inner
            .store(StoreAction::Update(id), input, Payload::new())
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<Post> for PostClient {
    type Error = PostError;

    fn inner(&self) -> &ResourceClient<Post> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => PostError::NotFound(id),
            FrameworkError::Schema(e) => PostError::ValidationError(e.to_string()),
            // hook failures carry the PostError raised by the entity
            FrameworkError::EntityError(e) => match e.downcast::<PostError>() {
                Ok(e) => *e,
                Err(e) => PostError::ActorCommunicationError(e.to_string()),
            },
            e => PostError::ActorCommunicationError(e.to_string()),
        }
    }
}
