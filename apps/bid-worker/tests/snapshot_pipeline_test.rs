//! End-to-end: auction lifecycle events into the bid-service snapshot store.

use chrono::{TimeZone, Utc};
use domain_auctions::{AuctionCreated, AuctionDeleted};
use domain_bids::{BidProjector, InMemorySnapshotStore, SnapshotStore};
use messaging::{Dispatcher, EventPublisher, InMemoryBroker, Message, MessageBroker};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

fn created(id: Uuid) -> AuctionCreated {
    AuctionCreated {
        id,
        reserve_price: 40_000,
        seller: "dave".into(),
        make: "Mercedes".into(),
        model: "SLK".into(),
        color: "red".into(),
        mileage: 30_000,
        year: 2019,
        image_url: "https://cdn.example.com/slk.jpg".into(),
        auction_start: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        auction_end: Utc.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap(),
    }
}

async fn wait_until(store: &InMemorySnapshotStore, len: usize) {
    for _ in 0..200 {
        if store.len() == len {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("snapshot store did not reach {len} records in time");
}

#[tokio::test]
async fn test_created_and_deleted_drive_the_snapshot_store() {
    let broker = Arc::new(InMemoryBroker::new());
    let store = Arc::new(InMemorySnapshotStore::new());
    let dispatcher = Arc::new(Dispatcher::new(broker.clone(), "bids"));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Create the group channels up front so nothing published is dropped
    // while the workers are still starting.
    drop(broker.subscribe(AuctionCreated::TOPIC, "bids").await.unwrap());
    drop(broker.subscribe(AuctionDeleted::TOPIC, "bids").await.unwrap());

    let created_worker = {
        let dispatcher = dispatcher.clone();
        let handler = BidProjector::new(store.clone());
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            dispatcher
                .run::<AuctionCreated, _>(AuctionCreated::TOPIC, handler, shutdown)
                .await
                .unwrap();
        })
    };
    let deleted_worker = {
        let dispatcher = dispatcher.clone();
        let handler = BidProjector::new(store.clone());
        let shutdown = shutdown_rx;
        tokio::spawn(async move {
            dispatcher
                .run::<AuctionDeleted, _>(AuctionDeleted::TOPIC, handler, shutdown)
                .await
                .unwrap();
        })
    };

    let publisher = EventPublisher::new(broker);
    let id = Uuid::new_v4();

    publisher.publish(&created(id)).await.unwrap();
    wait_until(&store, 1).await;

    let snapshot = store.get(id).await.unwrap().unwrap();
    assert_eq!(snapshot.seller, "dave");
    assert_eq!(snapshot.reserve_price, 40_000);

    publisher.publish(&AuctionDeleted { id }).await.unwrap();
    wait_until(&store, 0).await;

    shutdown_tx.send(true).unwrap();
    created_worker.await.unwrap();
    deleted_worker.await.unwrap();
}
