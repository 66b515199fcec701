//! # System Lifecycle & Orchestration
//!
//! Starts the resource actors, wires them together and shuts them down again.
//!
//! ## Wiring
//!
//! Actors are created first and receive their dependencies only when their run loop starts:
//!
//! ```rust,ignore
//! let (user_actor, user_client) = user_actor::new(&config);
//! let (post_actor, post_client) = post_actor::new(&config);
//! let (message_actor, message_client) = message_actor::new(&config);
//!
//! tokio::spawn(user_actor.run(()));
//! tokio::spawn(post_actor.run(user_client.clone()));
//! tokio::spawn(message_actor.run(user_client.clone()));
//! ```
//!
//! Posts and messages check their owner through the user client, so the dependency graph is
//! `post -> user` and `message -> user`, with no cycles.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of each channel
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - every actor task is joined
//!
//! The user actor stops last: its channel stays open until the post and message actors, which
//! hold clones of its client, have finished.
//!
//! ## Observability
//!
//! [`setup_tracing`] installs the `fmt` subscriber; `RUST_LOG=debug` shows every request.

pub mod app_system;

pub use app_system::*;
pub use resource_framework::tracing::setup_tracing;
