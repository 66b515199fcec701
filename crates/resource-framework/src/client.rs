//! # Generic Client
//!
//! This module defines the generic client for communicating with actors.

use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, StoreAction};
use crate::schema::{ModifyAction, Payload};
use tokio::sync::{mpsc, oneshot};

/// ## ResourceClient
///
/// The `ResourceClient<T>` provides a type-safe async API for a `ResourceActor<T>`. Requests
/// travel over a Tokio mpsc channel and results come back on oneshot channels. The client only
/// holds a sender, so it is cheap to clone and share across tasks.
pub struct ResourceClient<T: ResourceEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ResourceEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: ResourceEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Creates or updates a resource from `input`.
    ///
    /// Only fillable fields are read from `input`. `forced` carries trusted values, such as an
    /// owner id, that are assigned regardless of the fillable list.
    pub async fn store(
        &self,
        action: StoreAction<T::Id>,
        input: Payload,
        forced: Payload,
    ) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Store {
            action,
            input,
            forced,
            respond_to,
        })
        .await
    }

    /// `store` with `preprocess` applied to the input before anything is extracted.
    pub async fn store_with<F>(
        &self,
        action: StoreAction<T::Id>,
        input: Payload,
        forced: Payload,
        preprocess: F,
    ) -> Result<T, FrameworkError>
    where
        F: FnOnce(Payload) -> Payload + Send,
    {
        self.store(action, preprocess(input), forced).await
    }

    pub async fn create(&self, input: Payload) -> Result<T, FrameworkError> {
        self.store(StoreAction::Create, input, Payload::new()).await
    }

    pub async fn find(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Find { id, respond_to })
            .await
    }

    pub async fn all(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::All { respond_to })
            .await
    }

    /// Applies `action` to the resource. `attribute` overrides the field the modify table
    /// would toggle.
    pub async fn modify(
        &self,
        id: T::Id,
        action: ModifyAction,
        attribute: Option<&str>,
    ) -> Result<T, FrameworkError> {
        let attribute = attribute.map(str::to_string);
        self.request(|respond_to| ResourceRequest::Modify {
            id,
            action,
            attribute,
            respond_to,
        })
        .await
    }
}
