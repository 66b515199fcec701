//! # Resource Framework
//!
//! Building blocks for services whose state is a set of *modifiable resources*: rows that are
//! created from whitelisted input, then shown, hidden, soft-deleted or stripped of their images,
//! each change running as a small transaction.
//!
//! It pairs a **Resource-Oriented** lifecycle with the **Actor Model**:
//!
//! - Every resource type gets its own [`ResourceActor`], a Tokio task that owns the rows and
//!   processes requests one at a time. No locks around the storage.
//! - Callers talk to it through a cloneable [`ResourceClient`].
//! - The shape of a resource lives in a [`Schema`]: typed fields, the fillable whitelist, the
//!   image fields and the modify table. Entities expose their fields through [`Attributes`],
//!   so `store` and `modify` are implemented once for every type.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ResourceEntity`], [`Attributes`], [`Schema`]) - your domain models
//! 2. **Runtime Layer** ([`ResourceActor`], [`Storage`]) - sequential processing and transactions
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe communication
//!
//! ## Lifecycle
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `store(Create, input)` | new row from `fillable ∩ keys(input)` |
//! | `store(Update(id), input)` | mass-assigns fillable fields onto an existing row |
//! | `modify(id, Delete)` | sets the delete marker (flag or timestamp), row stays |
//! | `modify(id, Destroy)` | nulls fillable image fields, row stays and is not deleted |
//! | `modify(id, Hide / Show / Status)` | flips the mapped 0/1 field |
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected when the actor starts, not when it is built:
//!
//! ```rust,ignore
//! let (user_actor, user_client) = ResourceActor::<User>::new(32, User::schema());
//! let (post_actor, post_client) = ResourceActor::<Post>::new(32, Post::schema());
//!
//! tokio::spawn(user_actor.run(()));
//! // posts validate their owner through the user client
//! tokio::spawn(post_actor.run(UserClient::new(user_client.clone())));
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers client requests from a queue of expectations, so code built
//! around a client can be tested without spawning actors. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod schema;
pub mod storage;
pub mod tracing;

// Re-export core types for convenience
pub use actor::{ResourceActor, DEFAULT_TRANSACTION_ATTEMPTS};
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::{Attributes, ResourceEntity};
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response, StoreAction};
pub use schema::{
    DeleteMarker, FieldDef, FieldKind, FieldValue, ModifyAction, ModifyFields, Payload, Schema,
    SchemaError, Transition, IMAGE_FIELDS,
};
pub use storage::{MemoryStorage, Storage, StorageError};
