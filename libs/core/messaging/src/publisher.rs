//! Publish-side of the event pipeline.

use crate::broker::MessageBroker;
use crate::error::PublishError;
use crate::fault::Fault;
use crate::message::Message;
use std::sync::Arc;
use tracing::{debug, warn};

/// Publishes committed events to the broker.
///
/// The contract with the owning service: call [`publish`](Self::publish)
/// after — and only after — the local mutation has durably committed, and
/// call it for every committed mutation. Publishing before commit leaks a
/// phantom to the rest of the system; skipping a publish after commit
/// causes permanent projection drift.
pub struct EventPublisher<B: MessageBroker> {
    broker: Arc<B>,
}

impl<B: MessageBroker> EventPublisher<B> {
    pub fn new(broker: Arc<B>) -> Self {
        Self { broker }
    }

    /// Publish an event on its contract topic.
    ///
    /// Returns once the broker has acknowledged the hand-off. A
    /// [`PublishError::Unavailable`] surfaces synchronously to the caller;
    /// the mutation has already committed, so this is an accepted
    /// inconsistency window, not a rollback trigger.
    pub async fn publish<M: Message>(&self, event: &M) -> Result<(), PublishError> {
        let payload = serde_json::to_vec(event)?;
        self.broker.send(M::TOPIC, payload).await?;

        debug!(
            topic = M::TOPIC,
            aggregate_id = %event.aggregate_id(),
            "Published event"
        );
        Ok(())
    }

    /// Publish a fault event on the contract's fault topic.
    pub async fn publish_fault<M: Message>(&self, fault: &Fault<M>) -> Result<(), PublishError> {
        let topic = M::fault_topic();
        let payload = serde_json::to_vec(fault)?;
        self.broker.send(&topic, payload).await?;

        warn!(
            topic = %topic,
            aggregate_id = %fault.message.aggregate_id(),
            exceptions = fault.exceptions.len(),
            "Published fault event"
        );
        Ok(())
    }
}

impl<B: MessageBroker> Clone for EventPublisher<B> {
    fn clone(&self) -> Self {
        Self {
            broker: self.broker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::MessageStream;
    use crate::memory::InMemoryBroker;
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Ping {
        id: Uuid,
    }

    impl Message for Ping {
        const TOPIC: &'static str = "ping";

        fn aggregate_id(&self) -> Uuid {
            self.id
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_subscriber() {
        let broker = Arc::new(InMemoryBroker::new());
        let mut stream = broker.subscribe(Ping::TOPIC, "workers").await.unwrap();
        let publisher = EventPublisher::new(broker);

        let ping = Ping { id: Uuid::new_v4() };
        publisher.publish(&ping).await.unwrap();

        let received: Ping = stream.next().await.unwrap().parse().unwrap();
        assert_eq!(received, ping);
    }

    #[tokio::test]
    async fn test_publish_surfaces_unavailability() {
        let broker = Arc::new(InMemoryBroker::new());
        broker.close().await.unwrap();
        let publisher = EventPublisher::new(broker);

        let result = publisher.publish(&Ping { id: Uuid::new_v4() }).await;
        assert!(matches!(result, Err(PublishError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_fault_goes_to_fault_topic() {
        let broker = Arc::new(InMemoryBroker::new());
        let mut faults = broker
            .subscribe(&Ping::fault_topic(), "workers")
            .await
            .unwrap();
        let publisher = EventPublisher::new(broker);

        let ping = Ping { id: Uuid::new_v4() };
        let fault = Fault::new(ping.clone(), vec![]);
        publisher.publish_fault(&fault).await.unwrap();

        let received: Fault<Ping> = faults.next().await.unwrap().parse().unwrap();
        assert_eq!(received.message, ping);
    }
}
