//! The bidding service's minimal view of an auction.

use chrono::{DateTime, Utc};
use domain_auctions::AuctionCreated;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Just enough auction state to accept or reject a bid: who sells, the
/// floor, and when bidding closes. Item attributes are irrelevant here,
/// which is why the bid worker ignores `auction.updated`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionSnapshot {
    pub id: Uuid,
    pub seller: String,
    pub reserve_price: i64,
    pub auction_end: DateTime<Utc>,
}

impl From<&AuctionCreated> for AuctionSnapshot {
    fn from(event: &AuctionCreated) -> Self {
        Self {
            id: event.id,
            seller: event.seller.clone(),
            reserve_price: event.reserve_price,
            auction_end: event.auction_end,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

/// Keyed store for [`AuctionSnapshot`] records, owned by the bid service.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync + 'static {
    async fn upsert(&self, snapshot: AuctionSnapshot) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<AuctionSnapshot>, StoreError>;

    /// Returns whether a snapshot was present.
    async fn remove(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Hash-map store for tests and local development.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<HashMap<Uuid, AuctionSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.read().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn upsert(&self, snapshot: AuctionSnapshot) -> Result<(), StoreError> {
        self.snapshots
            .write()
            .expect("store lock poisoned")
            .insert(snapshot.id, snapshot);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<AuctionSnapshot>, StoreError> {
        Ok(self
            .snapshots
            .read()
            .expect("store lock poisoned")
            .get(&id)
            .cloned())
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self
            .snapshots
            .write()
            .expect("store lock poisoned")
            .remove(&id)
            .is_some())
    }
}
