//! Compensation for auctions that failed to project downstream.

use crate::alert::AlertSink;
use crate::contracts::AuctionCreated;
use async_trait::async_trait;
use messaging::{EventHandler, EventPublisher, Fault, HandlerError, Message, MessageBroker};
use std::sync::Arc;
use tracing::info;

/// Fallback written over a `model` value a consumer rejected.
const FALLBACK_MODEL: &str = "unspecified";

/// Consumes `Fault<AuctionCreated>` and either repairs or escalates.
///
/// A fault whose first exception is a validation failure is treated as a
/// bad `model` value: the original event is republished with the model
/// replaced by [`FALLBACK_MODEL`], giving consumers a fresh retry budget
/// for a payload they can accept. Every other fault goes to the
/// [`AlertSink`] exactly once.
///
/// `handle` never returns an error. A compensator that faults would emit
/// `Fault<Fault<AuctionCreated>>` and loop; internal failures (including a
/// failed republish) are swallowed into an alert instead.
pub struct CreatedFaultCompensator<B: MessageBroker> {
    publisher: EventPublisher<B>,
    alerts: Arc<dyn AlertSink>,
}

impl<B: MessageBroker> CreatedFaultCompensator<B> {
    pub fn new(publisher: EventPublisher<B>, alerts: Arc<dyn AlertSink>) -> Self {
        Self { publisher, alerts }
    }

    async fn republish_corrected(&self, original: &AuctionCreated) -> Result<(), String> {
        let mut corrected = original.clone();
        corrected.model = FALLBACK_MODEL.to_string();

        self.publisher
            .publish(&corrected)
            .await
            .map_err(|e| e.to_string())?;

        info!(
            auction_id = %corrected.id,
            "Republished auction with fallback model"
        );
        Ok(())
    }
}

#[async_trait]
impl<B: MessageBroker> EventHandler<Fault<AuctionCreated>> for CreatedFaultCompensator<B> {
    async fn handle(&self, fault: &Fault<AuctionCreated>) -> Result<(), HandlerError> {
        let correctable = fault
            .first_exception()
            .is_some_and(|e| e.kind.is_correctable());

        if correctable {
            if let Err(reason) = self.republish_corrected(&fault.message).await {
                self.alerts.alert(&format!(
                    "failed to republish corrected {} for auction {}: {}",
                    AuctionCreated::TOPIC,
                    fault.message.id,
                    reason
                ));
            }
        } else {
            let kind = fault
                .first_exception()
                .map(|e| e.kind.to_string())
                .unwrap_or_else(|| "none".to_string());
            self.alerts.alert(&format!(
                "unhandled {} fault for auction {} (first exception: {})",
                AuctionCreated::TOPIC,
                fault.message.id,
                kind
            ));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "auction-created-fault-compensator"
    }
}
