//! In-memory broker for tests and local development.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::error::BrokerError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

type GroupMap = HashMap<String, HashMap<String, GroupChannel>>;

struct GroupChannel {
    tx: mpsc::UnboundedSender<ReceivedMessage>,
    rx: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<ReceivedMessage>>>,
}

/// In-memory [`MessageBroker`] with consumer-group semantics.
///
/// One unbounded FIFO channel per (topic, group): `send` fans out one copy
/// of the payload to every group subscribed to the topic, and members of a
/// group compete for messages from the shared channel. Publish order per
/// topic is preserved within each group.
///
/// Messages published on a topic before any group has subscribed to it are
/// dropped, matching a broker without persistence; register consumers
/// before publishing.
#[derive(Clone, Default)]
pub struct InMemoryBroker {
    topics: Arc<Mutex<GroupMap>>,
    closed: Arc<AtomicBool>,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageBroker for InMemoryBroker {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }

        let topics = self.topics.lock().expect("broker lock poisoned");
        if let Some(groups) = topics.get(topic) {
            for channel in groups.values() {
                // A dropped receiver means the group is gone; not fatal.
                let _ = channel.tx.send(ReceivedMessage {
                    topic: topic.to_string(),
                    payload: payload.clone(),
                });
            }
        }

        Ok(())
    }

    async fn subscribe(
        &self,
        topic: &str,
        group: &str,
    ) -> Result<Box<dyn MessageStream>, BrokerError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrokerError::Closed);
        }

        let mut topics = self.topics.lock().expect("broker lock poisoned");
        let groups = topics.entry(topic.to_string()).or_default();
        let channel = groups.entry(group.to_string()).or_insert_with(|| {
            let (tx, rx) = mpsc::unbounded_channel();
            GroupChannel {
                tx,
                rx: Arc::new(tokio::sync::Mutex::new(rx)),
            }
        });

        Ok(Box::new(InMemoryStream {
            rx: channel.rx.clone(),
        }))
    }

    async fn close(&self) -> Result<(), BrokerError> {
        self.closed.store(true, Ordering::SeqCst);
        // Dropping the senders ends every stream once drained.
        self.topics.lock().expect("broker lock poisoned").clear();
        Ok(())
    }
}

struct InMemoryStream {
    rx: Arc<tokio::sync::Mutex<mpsc::UnboundedReceiver<ReceivedMessage>>>,
}

#[async_trait]
impl MessageStream for InMemoryStream {
    async fn next(&mut self) -> Option<ReceivedMessage> {
        self.rx.lock().await.recv().await
    }
}
