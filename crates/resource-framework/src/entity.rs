//! # ResourceEntity Trait
//!
//! The `ResourceEntity` trait is the contract every persisted resource (User, Post, Message, ...)
//! implements to be managed by the generic [`ResourceActor`](crate::ResourceActor).
//!
//! The actor never touches struct fields directly. It reads and writes through [`Attributes`],
//! guided by the resource's [`Schema`](crate::Schema), so `store` and `modify` are written once
//! and work for every resource type.
//!
//! # Provided Methods (Hooks)
//! - [`ResourceEntity::on_create`] runs once, after input is assigned and before the insert is
//!   committed. The default does nothing.

use crate::schema::{FieldValue, SchemaError};
use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Named access to the fields of a resource.
pub trait Attributes {
    /// Current value of `name`, or `None` if the resource has no such field.
    fn attribute(&self, name: &str) -> Option<FieldValue>;

    /// Writes `name`. The value has already been coerced to the schema kind.
    fn set_attribute(&mut self, name: &str, value: FieldValue) -> Result<(), SchemaError>;

    /// A loaded related resource, e.g. the `user` of a message.
    ///
    /// Returns `None` when the relation does not exist or was not loaded.
    fn relation(&self, _name: &str) -> Option<&dyn Attributes> {
        None
    }
}

/// Trait that any resource must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can call other actors. The `Context` type is injected
/// into every hook at `run()` time, which lets a `Post` validate its owner through a
/// `UserClient` that did not exist yet when the post actor was built.
#[async_trait]
pub trait ResourceEntity: Attributes + Clone + Debug + Send + Sync + 'static {
    /// Must be convertible from u32 for automatic id generation.
    type Id: Eq + Ord + Hash + Clone + Send + Sync + Display + Debug + From<u32> + 'static;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    type Error: std::error::Error + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// A fresh record with every field at its default: visible and not deleted.
    fn new_record(id: Self::Id) -> Self;

    /// Called after the input is assigned and before the insert is committed.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }
}
