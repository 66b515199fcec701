//! # User Client
//!
//! Provides a high-level API for interacting with the `User` actor.
//! It wraps a `ResourceClient<User>` and exposes domain-specific methods.
use crate::model::{Role, User};
use crate::user_actor::UserError;
use async_trait::async_trait;
use resource_framework::{ActorClient, FrameworkError, Payload, ResourceClient, StoreAction};
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: ResourceClient<User>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<User>) -> Self {
        Self { inner }
    }

    /// Registers a user from `input` (`name`, `email`) with the given role.
    #[instrument(skip(self, input))]
    pub async fn register(&self, input: Payload, role: Role) -> Result<User, UserError> {
        debug!("Sending request");
        let forced = Payload::new().with("role", role.as_str());
        self.inner
            .store(StoreAction::Create, input, forced)
            .await
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &ResourceClient<User> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            FrameworkError::EntityError(e) => match e.downcast::<UserError>() {
                Ok(e) => *e,
                Err(e) => UserError::ActorCommunicationError(e.to_string()),
            },
            e => UserError::ActorCommunicationError(e.to_string()),
        }
    }
}
