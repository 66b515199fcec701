//! # Resource Controller
//!
//! The web-facing half of the resource lifecycle. A controller reads the `task` parameter,
//! loads the resource, asks the [`OwnershipPolicy`] whether the current user may touch it,
//! runs `store` / `modify` through the resource's client and leaves a one-line notice in the
//! session. End users only ever see those notices; denials become a redirect to their dashboard.

pub mod flash;
pub mod lang;
pub mod request;

pub use flash::{FlashKind, Flashes, Session};
pub use lang::Translator;
pub use request::{Request, UploadedFile};

use crate::upload::ImageError;
use crate::model::User;
use crate::policy::{OwnershipPolicy, PolicyOptions};
use resource_framework::{
    FrameworkError, ModifyAction, Payload, ResourceClient, ResourceEntity, SchemaError,
    StoreAction,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const TASK_CREATE: &str = "create";
pub const TASK_UPDATE: &str = "update";
pub const TASK_DELETE: &str = "delete";
pub const TASK_VIEW: &str = "view";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Task property is not found in current request")]
    TaskNotFound,
    #[error("Task is not defined or is defined as empty string")]
    EmptyTask,
    #[error("Task `{0}` is not handled here")]
    UnexpectedTask(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Framework(#[from] FrameworkError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Where the browser goes after a mutating request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "to", rename_all = "lowercase")]
pub enum Redirect {
    Back,
    Route(String),
}

/// Result of a controller action: the redirect plus the resource, if one came out of it.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub redirect: Redirect,
    pub resource: Option<T>,
}

impl<T> Outcome<T> {
    fn back(resource: Option<T>) -> Self {
        Self {
            redirect: Redirect::Back,
            resource,
        }
    }

    fn to(redirect: Redirect) -> Self {
        Self {
            redirect,
            resource: None,
        }
    }
}

/// The `task` parameter of `request`, validated.
pub fn task(request: &Request) -> Result<String, ControllerError> {
    let value = match request.param("task") {
        None | Some(resource_framework::FieldValue::Null) => {
            return Err(ControllerError::TaskNotFound)
        }
        Some(value) => value,
    };
    let task = match value.as_text() {
        Some(text) => text.to_string(),
        None => value.as_int().map(|n| n.to_string()).unwrap_or_default(),
    };
    if task.trim().is_empty() {
        return Err(ControllerError::EmptyTask);
    }
    Ok(task)
}

/// Whether the request's task is exactly `expected`.
pub fn is_task(request: &Request, expected: &str) -> Result<bool, ControllerError> {
    Ok(task(request)? == expected)
}

pub struct ResourceController<T: ResourceEntity> {
    client: ResourceClient<T>,
    entity_label: String,
    owner_field: Option<&'static str>,
    policy: OwnershipPolicy,
    options: PolicyOptions,
    lang: Translator,
}

impl<T: ResourceEntity> Clone for ResourceController<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            entity_label: self.entity_label.clone(),
            owner_field: self.owner_field,
            policy: self.policy.clone(),
            options: self.options.clone(),
            lang: self.lang.clone(),
        }
    }
}

impl<T: ResourceEntity> ResourceController<T> {
    /// `entity_label` is the name shown in notices, e.g. "Post".
    pub fn new(client: ResourceClient<T>, entity_label: impl Into<String>) -> Self {
        Self {
            client,
            entity_label: entity_label.into(),
            owner_field: None,
            policy: OwnershipPolicy::new(),
            options: PolicyOptions::new(),
            lang: Translator::english(),
        }
    }

    /// Field set to the current user's id when a resource is created.
    pub fn owner_field(mut self, field: &'static str) -> Self {
        self.owner_field = Some(field);
        self
    }

    pub fn policy_options(mut self, options: PolicyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn translator(mut self, lang: Translator) -> Self {
        self.lang = lang;
        self
    }

    pub fn entity_label(&self) -> &str {
        &self.entity_label
    }

    pub async fn find_entity_instance(&self, id: T::Id) -> Result<Option<T>, ControllerError> {
        Ok(self.client.find(id).await?)
    }

    /// Flashes the notice matching the outcome of a `modify`.
    pub fn handle_modify_response<E>(
        &self,
        result: &Result<T, E>,
        action: ModifyAction,
        entity: &str,
        session: &mut Session,
    ) {
        if result.is_err() {
            self.flash_error(session, self.lang.translate(lang::OOOPS, &[]));
            return;
        }
        let key = match action {
            ModifyAction::Delete => lang::STATUS_DELETE,
            ModifyAction::Destroy => lang::STATUS_DESTROY,
            _ => lang::CHANGED_STATUS,
        };
        self.flash_success(session, self.lang.translate(key, &[("entity", entity)]));
    }

    /// `task` names the modification (`delete`, `destroy`, `hide`, `show`, `status`).
    #[instrument(skip(self, user, request, session), fields(user_id = %user.id))]
    pub async fn modify(
        &self,
        user: &User,
        id: T::Id,
        request: &Request,
        session: &mut Session,
    ) -> Result<Outcome<T>, ControllerError> {
        let action: ModifyAction = task(request)?.parse()?;

        let resource = self
            .find_entity_instance(id.clone())
            .await?
            .ok_or_else(|| ControllerError::NotFound(format!("{} {id}", self.entity_label)))?;

        if !self
            .policy
            .is_owner_or_privileged(user, &resource, &self.options)
        {
            warn!(%action, "Modification denied");
            return Ok(Outcome::to(self.redirect_unauthorized_user(user, session)));
        }

        let result = self.client.modify(id, action, None).await;
        match &result {
            Ok(_) => info!(%action, "Resource modified"),
            Err(e) => warn!(%action, error = %e, "Modify failed"),
        }
        self.handle_modify_response(&result, action, &self.entity_label, session);
        Ok(Outcome::back(result.ok()))
    }

    pub async fn store(
        &self,
        user: &User,
        request: Request,
        session: &mut Session,
    ) -> Result<Outcome<T>, ControllerError> {
        self.store_with(user, request, session, |input| input).await
    }

    /// Creates (`task=create`) or updates (`task=update` with an `id`) a resource.
    ///
    /// `preprocess` runs on the request parameters before fillable fields are extracted.
    /// Mistyped input is returned as an error; persistence failures only flash a notice.
    #[instrument(skip(self, user, request, session, preprocess), fields(user_id = %user.id))]
    pub async fn store_with<F>(
        &self,
        user: &User,
        request: Request,
        session: &mut Session,
        preprocess: F,
    ) -> Result<Outcome<T>, ControllerError>
    where
        F: FnOnce(Payload) -> Payload + Send,
    {
        let task = task(&request)?;
        let (action, forced) = match task.as_str() {
            TASK_CREATE => {
                let mut forced = Payload::new();
                if let Some(field) = self.owner_field {
                    forced.insert(field, user.id);
                }
                (StoreAction::Create, forced)
            }
            TASK_UPDATE => {
                let id = request_id::<T>(&request)?;
                let resource = self
                    .find_entity_instance(id.clone())
                    .await?
                    .ok_or_else(|| ControllerError::NotFound(format!("{} {id}", self.entity_label)))?;
                if !self
                    .policy
                    .is_owner_or_privileged(user, &resource, &self.options)
                {
                    warn!("Update denied");
                    return Ok(Outcome::to(self.redirect_unauthorized_user(user, session)));
                }
                (StoreAction::Update(id), Payload::new())
            }
            _ => return Err(ControllerError::UnexpectedTask(task)),
        };

        let key = match action {
            StoreAction::Create => lang::STATUS_CREATE,
            StoreAction::Update(_) => lang::STATUS_UPDATE,
        };
        let input = request.into_params();

        match self
            .client
            .store_with(action, input, forced, preprocess)
            .await
        {
            Ok(resource) => {
                info!(id = %resource.id(), "Resource stored");
                let line = self.lang.translate(key, &[("entity", self.entity_label.as_str())]);
                self.flash_success(session, line);
                Ok(Outcome::back(Some(resource)))
            }
            Err(FrameworkError::Schema(e)) => Err(e.into()),
            Err(e) => {
                warn!(error = %e, "Store failed");
                self.flash_error(session, self.lang.translate(lang::OOOPS, &[]));
                Ok(Outcome::back(None))
            }
        }
    }

    /// Sends the user back to their dashboard with a "not allowed" notice.
    pub fn redirect_unauthorized_user(&self, user: &User, session: &mut Session) -> Redirect {
        self.flash_error(session, self.lang.translate(lang::NOT_ALLOWED, &[]));
        Redirect::Route(user.role.dashboard_route())
    }

    pub fn flash_success(&self, session: &mut Session, message: impl Into<String>) {
        session.flash(FlashKind::Success, message);
    }

    pub fn flash_error(&self, session: &mut Session, message: impl Into<String>) {
        session.flash(FlashKind::Error, message);
    }

    pub fn flash_notice(&self, session: &mut Session, message: impl Into<String>) {
        session.flash(FlashKind::Notice, message);
    }
}

fn request_id<T: ResourceEntity>(request: &Request) -> Result<T::Id, ControllerError> {
    request
        .param("id")
        .and_then(|value| value.as_int())
        .and_then(|id| u32::try_from(id).ok())
        .map(T::Id::from)
        .ok_or_else(|| ControllerError::NotFound("id".into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(task: Option<&str>) -> Request {
        let params = match task {
            Some(task) => Payload::new().with("task", task),
            None => Payload::new(),
        };
        Request::new(params)
    }

    #[test]
    fn test_is_task() {
        assert!(is_task(&request(Some("create")), TASK_CREATE).unwrap());
        assert!(!is_task(&request(Some("create")), TASK_UPDATE).unwrap());
        assert!(matches!(
            is_task(&request(None), TASK_UPDATE),
            Err(ControllerError::TaskNotFound)
        ));
        assert!(matches!(
            is_task(&request(Some("   ")), TASK_UPDATE),
            Err(ControllerError::EmptyTask)
        ));
        assert!(matches!(
            is_task(
                &Request::new(Payload::new().with("task", resource_framework::FieldValue::Null)),
                TASK_VIEW
            ),
            Err(ControllerError::TaskNotFound)
        ));
    }
}
