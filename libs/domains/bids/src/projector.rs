//! Projects auction lifecycle events into bid-service snapshots.

use crate::snapshot::{AuctionSnapshot, SnapshotStore, StoreError};
use async_trait::async_trait;
use domain_auctions::{AuctionCreated, AuctionDeleted};
use messaging::{EventHandler, HandlerError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Maintains the snapshot the bid service validates incoming bids against.
///
/// Subscribes only to created and deleted events; attribute updates never
/// change a snapshot.
pub struct BidProjector<S: SnapshotStore> {
    store: Arc<S>,
}

impl<S: SnapshotStore> BidProjector<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::transient_with_source("snapshot store operation failed", err)
    }
}

#[async_trait]
impl<S: SnapshotStore> EventHandler<AuctionCreated> for BidProjector<S> {
    async fn handle(&self, event: &AuctionCreated) -> Result<(), HandlerError> {
        self.store.upsert(AuctionSnapshot::from(event)).await?;
        debug!(auction_id = %event.id, "Stored auction snapshot");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "bids-auction-created"
    }
}

#[async_trait]
impl<S: SnapshotStore> EventHandler<AuctionDeleted> for BidProjector<S> {
    async fn handle(&self, event: &AuctionDeleted) -> Result<(), HandlerError> {
        if self.store.remove(event.id).await? {
            debug!(auction_id = %event.id, "Removed auction snapshot");
        } else {
            warn!(auction_id = %event.id, "Delete for unknown auction, skipping");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "bids-auction-deleted"
    }
}
