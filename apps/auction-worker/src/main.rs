//! Auction worker
//!
//! Consumes fault events raised against the auction service's own
//! contracts and compensates where a correction is known, alerting an
//! operator otherwise.

use core_config::broker::BrokerConfig;
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_auctions::{AuctionCreated, CreatedFaultCompensator, LogAlertSink};
use eyre::Result;
use messaging::{Dispatcher, EventPublisher, Fault, Message, MessageBroker, NatsBroker, RetryPolicy};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    info!("Starting auction worker");

    let config = BrokerConfig::from_env()?;
    let broker = Arc::new(NatsBroker::connect_with_name(&config.url, "auction-worker").await?);
    info!(url = %config.url, group = %config.group, "Connected to NATS");

    let compensator = CreatedFaultCompensator::new(
        EventPublisher::new(broker.clone()),
        Arc::new(LogAlertSink),
    );

    let dispatcher = Dispatcher::new(broker.clone(), config.group).with_retry(RetryPolicy::new(
        config.retry_max_attempts,
        config.retry_interval,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    dispatcher
        .run::<Fault<AuctionCreated>, _>(
            &AuctionCreated::fault_topic(),
            compensator,
            shutdown_rx,
        )
        .await?;

    broker.close().await?;
    info!("Auction worker stopped");
    Ok(())
}
