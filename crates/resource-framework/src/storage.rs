//! # Storage
//!
//! The persistence seam behind a [`ResourceActor`](crate::ResourceActor). The actor stages every
//! change on a copy and hands the finished row to [`Storage::commit`]; a commit either lands
//! completely or not at all.
//!
//! [`MemoryStorage`] is the default backend. Other backends only need to report which failures
//! are worth another attempt through [`StorageError::is_transient`].

use crate::entity::ResourceEntity;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorageError {
    /// Another writer got there first. Safe to retry.
    #[error("Write conflict: {0}")]
    Conflict(String),
    #[error("Storage failure: {0}")]
    Backend(String),
}

impl StorageError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }
}

pub trait Storage<T: ResourceEntity>: Send + 'static {
    fn find(&self, id: &T::Id) -> Option<T>;

    /// Every row, in id order.
    fn all(&self) -> Vec<T>;

    /// Inserts or replaces the row keyed by `item.id()`.
    fn commit(&mut self, item: T) -> Result<(), StorageError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rows kept in a `BTreeMap`, so iteration follows id order (which is insertion order for
/// sequential ids).
#[derive(Debug)]
pub struct MemoryStorage<T: ResourceEntity> {
    rows: BTreeMap<T::Id, T>,
}

impl<T: ResourceEntity> Default for MemoryStorage<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T: ResourceEntity> MemoryStorage<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: ResourceEntity> Storage<T> for MemoryStorage<T> {
    fn find(&self, id: &T::Id) -> Option<T> {
        self.rows.get(id).cloned()
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn commit(&mut self, item: T) -> Result<(), StorageError> {
        self.rows.insert(item.id(), item);
        Ok(())
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
