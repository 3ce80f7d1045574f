//! Search worker
//!
//! Consumes auction lifecycle events and maintains the search projection.

use core_config::broker::BrokerConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_auctions::{AuctionCreated, AuctionDeleted, AuctionUpdated};
use domain_search::{InMemorySearchStore, SearchProjector};
use eyre::Result;
use messaging::{Dispatcher, Message, MessageBroker, NatsBroker, RetryPolicy};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    info!("Starting search worker");

    let config = BrokerConfig::from_env()?;
    let broker = Arc::new(NatsBroker::connect_with_name(&config.url, "search-worker").await?);
    info!(url = %config.url, group = %config.group, "Connected to NATS");

    // Pluggable behind SearchStore; in-memory is the only backend so far.
    let store = Arc::new(InMemorySearchStore::new());

    let dispatcher = Arc::new(
        Dispatcher::new(broker.clone(), config.group).with_retry(RetryPolicy::new(
            config.retry_max_attempts,
            config.retry_interval,
        )),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let created = {
        let dispatcher = dispatcher.clone();
        let handler = SearchProjector::new(store.clone());
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            dispatcher
                .run::<AuctionCreated, _>(AuctionCreated::TOPIC, handler, shutdown)
                .await
        })
    };

    let updated = {
        let dispatcher = dispatcher.clone();
        let handler = SearchProjector::new(store.clone());
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            dispatcher
                .run::<AuctionUpdated, _>(AuctionUpdated::TOPIC, handler, shutdown)
                .await
        })
    };

    let deleted = {
        let dispatcher = dispatcher.clone();
        let handler = SearchProjector::new(store.clone());
        let shutdown = shutdown_rx;
        tokio::spawn(async move {
            dispatcher
                .run::<AuctionDeleted, _>(AuctionDeleted::TOPIC, handler, shutdown)
                .await
        })
    };

    created.await??;
    updated.await??;
    deleted.await??;

    broker.close().await?;
    info!("Search worker stopped");
    Ok(())
}
