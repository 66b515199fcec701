//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns the rows of one resource
//! type and runs every write against them as a transaction. It is the "Server" side of the
//! actor model: messages are processed sequentially, so the storage needs no locks.

use crate::client::ResourceClient;
use crate::entity::ResourceEntity;
use crate::error::FrameworkError;
use crate::message::{ResourceRequest, StoreAction};
use crate::schema::{FieldValue, ModifyAction, Payload, Schema, SchemaError, Transition};
use crate::storage::{MemoryStorage, Storage, StorageError};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Attempts per transaction unless configured otherwise.
pub const DEFAULT_TRANSACTION_ATTEMPTS: u32 = 2;

/// The generic actor that manages every row of one resource type.
///
/// # Usage Pattern
///
/// 1.  **Create**: `ResourceActor::new(buffer, schema)` returns the actor (server) and its
///     `ResourceClient` (interface).
/// 2.  **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: spawn the run loop in a background task.
///
/// # Operations
///
/// * **Store**:
///     1. Takes `fillable ∩ keys(input)` from the input, coerced to the schema kinds.
///        Unknown keys are dropped; trusted `forced` values are added on top.
///     2. `Create` allocates the next sequential id, builds `T::new_record`, assigns the
///        values and runs the `on_create` hook. `Update(id)` assigns onto the stored row.
///     3. Commits inside a transaction.
///
/// * **Modify**:
///     1. Resolves the [`Transition`] from the schema's modify table.
///     2. Inside a transaction: reloads the row, applies the transition, commits.
///        `Delete` sets the delete marker, `Destroy` nulls fillable image fields,
///        `Toggle` writes the 0/1 negation of the current value.
///
/// A transaction re-stages and re-commits after a transient storage conflict, up to the
/// configured number of attempts. Any other failure aborts it and nothing is written.
pub struct ResourceActor<T: ResourceEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    schema: Schema,
    storage: Box<dyn Storage<T>>,
    next_id: u32,
    attempts: u32,
    entity_type: &'static str,
}

impl<T: ResourceEntity> ResourceActor<T> {
    /// Creates an actor backed by [`MemoryStorage`], plus its client.
    ///
    /// `buffer_size` is the capacity of the request channel. When it is full, client calls
    /// wait for space.
    pub fn new(buffer_size: usize, schema: Schema) -> (Self, ResourceClient<T>) {
        Self::with_storage(buffer_size, schema, MemoryStorage::new())
    }

    /// Creates an actor over an existing storage backend.
    pub fn with_storage(
        buffer_size: usize,
        schema: Schema,
        storage: impl Storage<T>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let next_id = u32::try_from(storage.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1);
        // "Post" instead of "resource_app::model::post::Post"
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");

        let actor = Self {
            receiver,
            schema,
            storage: Box::new(storage),
            next_id,
            attempts: DEFAULT_TRANSACTION_ATTEMPTS,
            entity_type,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Sets how many times a transaction is attempted. Values below 1 count as 1.
    pub fn transaction_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts.max(1);
        self
    }

    /// Runs the event loop until every client is dropped.
    ///
    /// The `context` is handed to every entity hook, so dependencies created after the actor
    /// (but before the loop started) are still reachable.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = self.entity_type;
        info!(entity_type, schema = self.schema.name(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Store {
                    action,
                    input,
                    forced,
                    respond_to,
                } => {
                    debug!(entity_type, ?action, fields = input.len(), "Store");
                    let result = self.store(action, &input, &forced, &context).await;
                    match &result {
                        Ok(item) => {
                            info!(entity_type, id = %item.id(), size = self.storage.len(), "Stored")
                        }
                        Err(e) => warn!(entity_type, error = %e, "Store failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Find { id, respond_to } => {
                    let item = self.storage.find(&id);
                    debug!(entity_type, %id, found = item.is_some(), "Find");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::All { respond_to } => {
                    let items = self.storage.all();
                    debug!(entity_type, count = items.len(), "All");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Modify {
                    id,
                    action,
                    attribute,
                    respond_to,
                } => {
                    debug!(entity_type, %id, %action, ?attribute, "Modify");
                    let result = self.modify(id.clone(), action, attribute.as_deref());
                    match &result {
                        Ok(_) => info!(entity_type, %id, %action, "Modified"),
                        Err(e) => warn!(entity_type, %id, %action, error = %e, "Modify failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.storage.len(), "Shutdown");
    }

    /// Next sequential id not already present in storage. Seeded backends may have gaps.
    fn allocate_id(&mut self) -> Result<T::Id, FrameworkError> {
        while self.next_id < u32::MAX {
            let id = T::Id::from(self.next_id);
            self.next_id += 1;
            if self.storage.find(&id).is_none() {
                return Ok(id);
            }
        }
        Err(FrameworkError::Persistence(StorageError::Backend(
            "id space exhausted".into(),
        )))
    }

    async fn store(
        &mut self,
        action: StoreAction<T::Id>,
        input: &Payload,
        forced: &Payload,
        context: &T::Context,
    ) -> Result<T, FrameworkError> {
        let fields = assignable_fields(&self.schema, input, forced)?;

        match action {
            StoreAction::Create => {
                let id = self.allocate_id()?;

                let mut item = T::new_record(id);
                assign(&mut item, &fields)?;
                item.on_create(context)
                    .await
                    .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

                transaction(
                    self.storage.as_mut(),
                    self.attempts,
                    self.entity_type,
                    |_| Ok(item.clone()),
                )
            }
            StoreAction::Update(id) => transaction(
                self.storage.as_mut(),
                self.attempts,
                self.entity_type,
                |storage| {
                    let mut item = storage
                        .find(&id)
                        .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
                    assign(&mut item, &fields)?;
                    Ok(item)
                },
            ),
        }
    }

    fn modify(
        &mut self,
        id: T::Id,
        action: ModifyAction,
        attribute: Option<&str>,
    ) -> Result<T, FrameworkError> {
        let transition = self.schema.transition(action, attribute)?;
        let schema = &self.schema;

        transaction(
            self.storage.as_mut(),
            self.attempts,
            self.entity_type,
            |storage| {
                let mut item = storage
                    .find(&id)
                    .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
                apply_transition(schema, &mut item, &transition)?;
                Ok(item)
            },
        )
    }
}

/// Stages a row with `stage` and commits it, retrying transient conflicts.
fn transaction<T, F>(
    storage: &mut dyn Storage<T>,
    attempts: u32,
    entity_type: &str,
    stage: F,
) -> Result<T, FrameworkError>
where
    T: ResourceEntity,
    F: Fn(&dyn Storage<T>) -> Result<T, FrameworkError>,
{
    let mut attempt = 1;
    loop {
        let staged = stage(&*storage)?;
        match storage.commit(staged.clone()) {
            Ok(()) => return Ok(staged),
            Err(e) if e.is_transient() && attempt < attempts => {
                warn!(entity_type, attempt, error = %e, "Transaction conflict, retrying");
                attempt += 1;
            }
            Err(e) => {
                warn!(entity_type, attempt, error = %e, "Transaction aborted");
                return Err(e.into());
            }
        }
    }
}

/// Fillable input first, then the trusted values, which win on overlap.
fn assignable_fields(
    schema: &Schema,
    input: &Payload,
    forced: &Payload,
) -> Result<Vec<(String, FieldValue)>, SchemaError> {
    let mut fields: Vec<(String, FieldValue)> = schema
        .fillable_from(input)?
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();

    for (name, value) in forced.iter() {
        fields.push((name.to_string(), schema.coerce(name, value.clone())?));
    }
    Ok(fields)
}

fn assign<T: ResourceEntity>(
    item: &mut T,
    fields: &[(String, FieldValue)],
) -> Result<(), SchemaError> {
    for (name, value) in fields {
        item.set_attribute(name, value.clone())?;
    }
    Ok(())
}

fn apply_transition<T: ResourceEntity>(
    schema: &Schema,
    item: &mut T,
    transition: &Transition,
) -> Result<(), SchemaError> {
    match transition {
        Transition::Delete => {
            let marker = schema.delete_marker();
            item.set_attribute(marker.field(), marker.deleted_value())
        }
        Transition::Destroy => {
            for field in schema.destroyable_fields() {
                let cleared = schema.coerce(field, FieldValue::Null)?;
                item.set_attribute(field, cleared)?;
            }
            Ok(())
        }
        Transition::Toggle(field) => {
            let current = item
                .attribute(field)
                .ok_or_else(|| SchemaError::UnknownField {
                    resource: schema.name().to_string(),
                    field: field.clone(),
                })?;
            let next = schema.coerce(field, FieldValue::flag(current.is_empty()))?;
            item.set_attribute(field, next)
        }
    }
}
