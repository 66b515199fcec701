//! # ActorClient Trait
//!
//! Common interface for resource-specific clients, adding default `find`, `all` and `modify`
//! methods on top of a generic `ResourceClient`.
use crate::{FrameworkError, ModifyAction, ResourceClient, ResourceEntity};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit the standard lifecycle operations.
///
/// Implementors provide access to the inner client and a mapping from framework errors into
/// their own error type. `store` is left to the wrapper, since each resource decides which
/// trusted values (owner, role) it forces.
///
/// ```rust,ignore
/// #[async_trait]
/// impl ActorClient<Post> for PostClient {
///     type Error = PostError;
///
///     fn inner(&self) -> &ResourceClient<Post> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         PostError::from(e)
///     }
/// }
///
/// // find(), all() and modify() come for free
/// let post = client.modify(id, ModifyAction::Hide, None).await?;
/// ```
#[async_trait]
pub trait ActorClient<T: ResourceEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    #[tracing::instrument(skip(self))]
    async fn find(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().find(id).await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn all(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().all().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn modify(
        &self,
        id: T::Id,
        action: ModifyAction,
        attribute: Option<&str>,
    ) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner()
            .modify(id, action, attribute)
            .await
            .map_err(Self::map_error)
    }
}
