//! NATS implementation of the MessageBroker trait.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::error::BrokerError;
use async_nats::{Client, Subscriber};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

/// NATS-based message broker implementation.
///
/// Consumer groups map to NATS queue groups; per-publisher order is
/// whatever core NATS provides (publish order per connection). Run one
/// queue-group member per process if strict per-aggregate serialization is
/// required.
pub struct NatsBroker {
    client: Client,
}

impl NatsBroker {
    /// Connect to a NATS server.
    pub async fn connect(url: &str) -> Result<Self, BrokerError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|e| BrokerError::Unavailable(format!("connect to {}: {}", url, e)))?;

        Ok(Self { client })
    }

    /// Connect with a client name (shows up in broker monitoring).
    pub async fn connect_with_name(url: &str, name: &str) -> Result<Self, BrokerError> {
        let client = async_nats::ConnectOptions::new()
            .name(name)
            .connect(url)
            .await
            .map_err(|e| BrokerError::Unavailable(format!("connect to {}: {}", url, e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl MessageBroker for NatsBroker {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), BrokerError> {
        self.client
            .publish(topic.to_string(), payload.into())
            .await
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;

        // Flush so the send is an acknowledged hand-off, not a buffered one.
        self.client
            .flush()
            .await
            .map_err(|e| BrokerError::Unavailable(e.to_string()))?;

        debug!(topic = %topic, "Published message");
        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        group: &str,
    ) -> Result<Box<dyn MessageStream>, BrokerError> {
        let subscriber = self
            .client
            .queue_subscribe(topic.to_string(), group.to_string())
            .await
            .map_err(|e| BrokerError::Subscribe {
                topic: topic.to_string(),
                details: e.to_string(),
            })?;

        Ok(Box::new(NatsMessageStream { subscriber }))
    }

    async fn close(&self) -> Result<(), BrokerError> {
        self.client
            .drain()
            .await
            .map_err(|e| BrokerError::Unavailable(e.to_string()))
    }
}

/// NATS message stream wrapper.
struct NatsMessageStream {
    subscriber: Subscriber,
}

#[async_trait]
impl MessageStream for NatsMessageStream {
    async fn next(&mut self) -> Option<ReceivedMessage> {
        self.subscriber.next().await.map(|msg| ReceivedMessage {
            topic: msg.subject.to_string(),
            payload: msg.payload.to_vec(),
        })
    }
}
