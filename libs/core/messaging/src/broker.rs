//! Broker client abstraction.
//!
//! Services talk to the broker through this trait only, so an in-memory
//! fake can stand in for NATS in tests. The client has an explicit
//! lifecycle: construct/connect, use, `close` — never a process-wide
//! singleton.

use crate::error::BrokerError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Abstract message broker interface.
///
/// Delivery contract: every payload sent to a topic reaches each
/// subscribed consumer group at least once, in publish order per
/// publisher. No ordering is guaranteed across topics or aggregates.
#[async_trait]
pub trait MessageBroker: Send + Sync + 'static {
    /// Publish a payload to a topic. Resolves once the broker has
    /// acknowledged the hand-off.
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), BrokerError>;

    /// Join a consumer group on a topic.
    ///
    /// Each group receives its own copy of every message; members within a
    /// group compete for messages (load balancing).
    async fn subscribe(
        &self,
        topic: &str,
        group: &str,
    ) -> Result<Box<dyn MessageStream>, BrokerError>;

    /// Close the client. Open streams end after draining what they
    /// already hold.
    async fn close(&self) -> Result<(), BrokerError>;
}

/// Stream of incoming messages for one subscription.
#[async_trait]
pub trait MessageStream: Send + Sync {
    /// Receive the next message; `None` once the subscription has ended.
    async fn next(&mut self) -> Option<ReceivedMessage>;
}

/// Raw message as delivered by the broker.
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Topic the message was received on
    pub topic: String,
    /// Raw payload bytes
    pub payload: Vec<u8>,
}

impl ReceivedMessage {
    /// Deserialize the payload as JSON.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
