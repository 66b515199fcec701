//! # Resource App
//!
//! A small content site built on `resource-framework`: users own posts, posts can be shown,
//! hidden, soft-deleted or stripped of their images, and a private chat pushes new messages to
//! every connected user.
//!
//! - **[model]**: [`User`](model::User), [`Post`](model::Post) and [`Message`](model::Message)
//!   with their schemas.
//! - **[clients]**: type-safe wrappers around each actor's `ResourceClient`.
//! - **[policy]**: who may modify what.
//! - **[controller]**: the task-driven `store` / `modify` flow with flashed notices.
//! - **[upload]**: resizing uploaded images before they are stored.
//! - **[chat]**: message persistence plus the broadcaster.
//! - **[lifecycle]**: starts and stops the actors.
//! - **[http]**: axum routes on top of all of the above.

pub mod chat;
pub mod clients;
pub mod config;
pub mod controller;
pub mod http;
pub mod lifecycle;
pub mod message_actor;
pub mod model;
pub mod policy;
pub mod post_actor;
pub mod upload;
pub mod user_actor;
