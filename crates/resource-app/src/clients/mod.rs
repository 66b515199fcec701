//! Type-safe wrappers around each resource's `ResourceClient`.

pub mod message_client;
pub mod post_client;
pub mod user_client;

pub use message_client::MessageClient;
pub use post_client::PostClient;
pub use user_client::UserClient;
