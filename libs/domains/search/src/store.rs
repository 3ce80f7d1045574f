//! Storage seam for the search projection.

use crate::item::SearchItem;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Store backend failure.
///
/// The projector maps these to transient handler errors: a flaky backend
/// earns a retry, not a fault.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("search store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed document store for [`SearchItem`] records.
///
/// Owned exclusively by the search service. Every operation must be safe
/// to repeat: `upsert` replaces, `remove` tolerates absence.
#[async_trait]
pub trait SearchStore: Send + Sync + 'static {
    async fn upsert(&self, item: SearchItem) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<SearchItem>, StoreError>;

    /// Returns whether a record was present.
    async fn remove(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Hash-map store for tests and local development.
#[derive(Default)]
pub struct InMemorySearchStore {
    items: RwLock<HashMap<Uuid, SearchItem>>,
}

impl InMemorySearchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.read().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SearchStore for InMemorySearchStore {
    async fn upsert(&self, item: SearchItem) -> Result<(), StoreError> {
        self.items
            .write()
            .expect("store lock poisoned")
            .insert(item.id, item);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<SearchItem>, StoreError> {
        Ok(self
            .items
            .read()
            .expect("store lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .items
            .write()
            .expect("store lock poisoned")
            .remove(&id)
            .is_some())
    }
}
