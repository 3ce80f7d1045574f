//! Projects auction events into the search store.

use crate::item::SearchItem;
use crate::store::{SearchStore, StoreError};
use async_trait::async_trait;
use domain_auctions::{AuctionCreated, AuctionDeleted, AuctionUpdated};
use messaging::{EventHandler, HandlerError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Keeps the search store consistent with the auction event stream.
///
/// Every handler is idempotent, and events for one auction arrive in
/// publish order on a healthy stream. An update or delete that arrives
/// before its create (a gap in the stream) is a logged no-op: the later
/// create installs the authoritative record, the orphaned update is lost
/// by design.
pub struct SearchProjector<S: SearchStore> {
    store: Arc<S>,
}

impl<S: SearchStore> SearchProjector<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        HandlerError::transient_with_source("search store operation failed", err)
    }
}

#[async_trait]
impl<S: SearchStore> EventHandler<AuctionCreated> for SearchProjector<S> {
    async fn handle(&self, event: &AuctionCreated) -> Result<(), HandlerError> {
        self.store.upsert(SearchItem::from(event)).await?;
        debug!(auction_id = %event.id, "Indexed auction");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "search-auction-created"
    }
}

#[async_trait]
impl<S: SearchStore> EventHandler<AuctionUpdated> for SearchProjector<S> {
    async fn handle(&self, event: &AuctionUpdated) -> Result<(), HandlerError> {
        match self.store.get(event.id).await? {
            Some(mut item) => {
                item.apply(event);
                self.store.upsert(item).await?;
                debug!(auction_id = %event.id, "Updated indexed auction");
            }
            None => {
                warn!(auction_id = %event.id, "Update for unknown auction, skipping");
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "search-auction-updated"
    }
}

#[async_trait]
impl<S: SearchStore> EventHandler<AuctionDeleted> for SearchProjector<S> {
    async fn handle(&self, event: &AuctionDeleted) -> Result<(), HandlerError> {
        if self.store.remove(event.id).await? {
            debug!(auction_id = %event.id, "Removed auction from index");
        } else {
            warn!(auction_id = %event.id, "Delete for unknown auction, skipping");
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "search-auction-deleted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemorySearchStore;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn projector() -> (SearchProjector<InMemorySearchStore>, Arc<InMemorySearchStore>) {
        let store = Arc::new(InMemorySearchStore::new());
        (SearchProjector::new(store.clone()), store)
    }

    fn created(id: Uuid) -> AuctionCreated {
        AuctionCreated {
            id,
            reserve_price: 20_000,
            seller: "alice".into(),
            make: "Ford".into(),
            model: "GT".into(),
            color: "white".into(),
            mileage: 50_000,
            year: 2020,
            image_url: "https://cdn.example.com/ford-gt.jpg".into(),
            auction_start: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            auction_end: Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
        }
    }

    fn updated(id: Uuid) -> AuctionUpdated {
        AuctionUpdated {
            id,
            make: None,
            model: Some("GT40".into()),
            color: Some("gulf blue".into()),
            mileage: None,
            year: None,
        }
    }

    #[tokio::test]
    async fn test_created_indexes_full_record() {
        let (projector, store) = projector();
        let event = created(Uuid::new_v4());

        EventHandler::handle(&projector, &event).await.unwrap();

        let item = store.get(event.id).await.unwrap().unwrap();
        assert_eq!(item, SearchItem::from(&event));
    }

    #[tokio::test]
    async fn test_created_twice_equals_once() {
        let (projector, store) = projector();
        let event = created(Uuid::new_v4());

        EventHandler::handle(&projector, &event).await.unwrap();
        EventHandler::handle(&projector, &event).await.unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get(event.id).await.unwrap().unwrap(),
            SearchItem::from(&event)
        );
    }

    #[tokio::test]
    async fn test_updated_merges_only_present_fields() {
        let (projector, store) = projector();
        let create = created(Uuid::new_v4());
        EventHandler::handle(&projector, &create).await.unwrap();

        EventHandler::handle(&projector, &updated(create.id))
            .await
            .unwrap();

        let item = store.get(create.id).await.unwrap().unwrap();
        assert_eq!(item.model, "GT40");
        assert_eq!(item.color, "gulf blue");
        // Unspecified fields keep their created values.
        assert_eq!(item.make, "Ford");
        assert_eq!(item.mileage, 50_000);
        assert_eq!(item.year, 2020);
    }

    #[tokio::test]
    async fn test_updated_twice_equals_once() {
        let (projector, store) = projector();
        let create = created(Uuid::new_v4());
        EventHandler::handle(&projector, &create).await.unwrap();

        let update = updated(create.id);
        EventHandler::handle(&projector, &update).await.unwrap();
        let after_first = store.get(create.id).await.unwrap().unwrap();

        EventHandler::handle(&projector, &update).await.unwrap();
        assert_eq!(store.get(create.id).await.unwrap().unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_update_before_create_is_skipped() {
        let (projector, store) = projector();
        let id = Uuid::new_v4();

        EventHandler::handle(&projector, &updated(id)).await.unwrap();
        assert!(store.is_empty());

        // The later create installs the authoritative record; the orphaned
        // update is not replayed.
        let create = created(id);
        EventHandler::handle(&projector, &create).await.unwrap();
        assert_eq!(
            store.get(id).await.unwrap().unwrap(),
            SearchItem::from(&create)
        );
    }

    #[tokio::test]
    async fn test_deleted_removes_record() {
        let (projector, store) = projector();
        let create = created(Uuid::new_v4());
        EventHandler::handle(&projector, &create).await.unwrap();

        EventHandler::handle(&projector, &AuctionDeleted { id: create.id })
            .await
            .unwrap();

        assert!(store.get(create.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_a_no_op() {
        let (projector, store) = projector();

        let result =
            EventHandler::handle(&projector, &AuctionDeleted { id: Uuid::new_v4() }).await;

        assert!(result.is_ok());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_equals_once() {
        let (projector, store) = projector();
        let create = created(Uuid::new_v4());
        EventHandler::handle(&projector, &create).await.unwrap();

        let delete = AuctionDeleted { id: create.id };
        EventHandler::handle(&projector, &delete).await.unwrap();
        EventHandler::handle(&projector, &delete).await.unwrap();

        assert!(store.is_empty());
    }
}
