//! HTTP transport: maps requests onto the chat service and the post controller.
//!
//! ## Routes
//!
//! - `GET /chat` - the chat view name.
//! - `GET /messages` - every message with its author.
//! - `POST /messages` - `{ "message": "..." }`; the `x-socket-id` header names the sender's
//!   socket so it is left out of the broadcast.
//! - `POST /posts` - `task=create` plus post fields.
//! - `POST /posts/:id` - `task=update` plus fields, or `task=delete|destroy|hide|show|status`.
//!
//! Every route needs an `x-user-id` header naming an active user. Controller routes answer
//! with the redirect and the notices flashed while handling the request.

use crate::chat::{ChatError, ChatService, SocketId};
use crate::clients::UserClient;
use crate::controller::{
    is_task, ControllerError, Flashes, Outcome, Redirect, Request, ResourceController, Session,
    TASK_UPDATE,
};
use crate::message_actor::MessageError;
use crate::model::{Post, PostId, User, UserId};
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use resource_framework::{ActorClient, Payload};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use thiserror::Error;
use tracing::{info, warn};

pub const USER_HEADER: &str = "x-user-id";
pub const SOCKET_HEADER: &str = "x-socket-id";

#[derive(Clone)]
pub struct AppState {
    pub users: UserClient,
    pub posts: ResourceController<Post>,
    pub chat: ChatService,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthenticated")]
    Unauthenticated,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ControllerError> for ApiError {
    fn from(e: ControllerError) -> Self {
        match e {
            ControllerError::NotFound(_) => ApiError::NotFound(e.to_string()),
            ControllerError::Framework(_) => ApiError::Internal(e.to_string()),
            _ => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::Message(MessageError::EmptyMessage) => ApiError::BadRequest(e.to_string()),
            ChatError::Unauthorized(_) => ApiError::Unauthenticated,
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

/// Body of every controller route.
#[derive(Debug, Serialize)]
pub struct ControllerResponse<T> {
    pub redirect: Redirect,
    #[serde(flatten)]
    pub flashes: Flashes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<T>,
}

impl<T> ControllerResponse<T> {
    fn new(outcome: Outcome<T>, mut session: Session) -> Self {
        Self {
            redirect: outcome.redirect,
            flashes: session.take_all(),
            resource: outcome.resource,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub message: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", get(chat_index))
        .route("/messages", get(fetch_messages).post(send_message))
        .route("/posts", post(store_post))
        .route("/posts/:id", post(modify_post))
        .with_state(state)
}

/// Serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "HTTP server listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

/// The active user named by the `x-user-id` header.
async fn current_user(users: &UserClient, headers: &HeaderMap) -> Result<User, ApiError> {
    let id = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u32>().ok())
        .ok_or(ApiError::Unauthenticated)?;

    match users.find(UserId(id)).await {
        Ok(Some(user)) if user.is_active() => Ok(user),
        Ok(_) => {
            warn!(user_id = id, "Rejected request from unknown or inactive user");
            Err(ApiError::Unauthenticated)
        }
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

async fn chat_index(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    current_user(&state.users, &headers).await?;
    Ok(Json(json!({ "view": state.chat.index() })))
}

async fn fetch_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    current_user(&state.users, &headers).await?;
    Ok(Json(state.chat.fetch_messages().await?))
}

async fn send_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<SendMessage>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let user = current_user(&state.users, &headers).await?;
    let socket = headers
        .get(SOCKET_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .map(SocketId);

    state.chat.send_message(&user, &body.message, socket).await?;
    Ok(Json(json!({ "status": "Message Sent!" })))
}

async fn store_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(params): Json<Payload>,
) -> Result<Json<ControllerResponse<Post>>, ApiError> {
    let user = current_user(&state.users, &headers).await?;
    let mut session = Session::new();
    let outcome = state
        .posts
        .store(&user, Request::new(params), &mut session)
        .await?;
    Ok(Json(ControllerResponse::new(outcome, session)))
}

/// `task=update` edits the post; any other task is a modification.
async fn modify_post(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    headers: HeaderMap,
    Json(mut params): Json<Payload>,
) -> Result<Json<ControllerResponse<Post>>, ApiError> {
    let user = current_user(&state.users, &headers).await?;
    let mut session = Session::new();

    let request = Request::new(params.clone());
    let outcome = if is_task(&request, TASK_UPDATE)? {
        params.insert("id", i64::from(id));
        state
            .posts
            .store(&user, Request::new(params), &mut session)
            .await?
    } else {
        state
            .posts
            .modify(&user, PostId(id), &request, &mut session)
            .await?
    };
    Ok(Json(ControllerResponse::new(outcome, session)))
}
