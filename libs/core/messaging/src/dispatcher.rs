//! Consumer dispatch with bounded flat-interval retry.

use crate::broker::{MessageBroker, MessageStream, ReceivedMessage};
use crate::error::{BrokerError, HandlerError};
use crate::fault::{ErrorDescriptor, Fault};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Handler for one event type.
///
/// Delivery is at least once, so `handle` must be idempotent: re-applying
/// the same event (or an out-of-order duplicate) must never corrupt state.
#[async_trait]
pub trait EventHandler<E>: Send + Sync {
    /// Process one event.
    ///
    /// The returned error's [`kind`](HandlerError::kind) decides what
    /// happens next: transient errors are retried, everything else faults.
    async fn handle(&self, event: &E) -> Result<(), HandlerError>;

    /// Handler name, used for logging.
    fn name(&self) -> &'static str;
}

/// Routes incoming events on one consumer group to their handlers.
///
/// State machine per message:
///
/// ```text
/// Received ──▶ Processing ──▶ Acknowledged
///                  │  ▲
///        transient │  │ flat interval (RetryScheduled)
///                  ▼  │
///             attempt < max ──no──▶ Faulted (Fault<E> on "<topic>.fault")
/// ```
///
/// Messages on a subscription are processed strictly one at a time, which
/// serializes handling per aggregate as long as the broker preserves
/// publish order for the group. The attempt counter is scoped to one
/// message and lives only here; broker-level redelivery (a crashed
/// process, an unacknowledged message) starts a fresh counter and never
/// double-counts toward giving up.
pub struct Dispatcher<B: MessageBroker> {
    broker: Arc<B>,
    group: String,
    retry: RetryPolicy,
}

impl<B: MessageBroker> Dispatcher<B> {
    pub fn new(broker: Arc<B>, group: impl Into<String>) -> Self {
        Self {
            broker,
            group: group.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Consume `topic` with `handler` until shutdown is signalled or the
    /// subscription ends.
    ///
    /// Shutdown stops pulling new messages; the in-flight message (and its
    /// remaining retry schedule) always runs to completion so no partial
    /// projector write is abandoned halfway. Dropping the sender end of the
    /// channel counts as a shutdown signal.
    pub async fn run<E, H>(
        &self,
        topic: &str,
        handler: H,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), BrokerError>
    where
        E: Serialize + DeserializeOwned + Send + Sync + 'static,
        H: EventHandler<E>,
    {
        let mut stream = self.broker.subscribe(topic, &self.group).await?;

        info!(
            topic = %topic,
            group = %self.group,
            handler = handler.name(),
            "Consumer started"
        );

        loop {
            let message = tokio::select! {
                changed = shutdown.changed() => {
                    // A dropped sender means the owner abandoned this
                    // consumer; stop rather than poll a dead channel.
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                message = stream.next() => match message {
                    Some(message) => message,
                    None => break,
                },
            };

            self.dispatch(topic, &handler, message).await;
        }

        info!(topic = %topic, handler = handler.name(), "Consumer stopped");
        Ok(())
    }

    async fn dispatch<E, H>(&self, topic: &str, handler: &H, message: ReceivedMessage)
    where
        E: Serialize + DeserializeOwned + Send + Sync + 'static,
        H: EventHandler<E>,
    {
        // An undecodable payload cannot be wrapped in a typed fault; drop
        // it rather than poison the subscription.
        let event: E = match message.parse() {
            Ok(event) => event,
            Err(e) => {
                error!(topic = %topic, error = %e, "Dropping undecodable message");
                return;
            }
        };

        let mut exceptions: Vec<ErrorDescriptor> = Vec::new();

        for attempt in 1..=self.retry.max_attempts {
            match handler.handle(&event).await {
                Ok(()) => {
                    debug!(
                        topic = %topic,
                        handler = handler.name(),
                        attempt = attempt,
                        "Message acknowledged"
                    );
                    return;
                }
                Err(err) => {
                    let retryable = err.kind().is_retryable();
                    exceptions.push(ErrorDescriptor::from(&err));

                    if retryable && self.retry.has_attempts_left(attempt) {
                        warn!(
                            topic = %topic,
                            handler = handler.name(),
                            attempt = attempt,
                            delay_ms = self.retry.interval.as_millis() as u64,
                            error = %err,
                            "Transient handler failure, retry scheduled"
                        );
                        tokio::time::sleep(self.retry.interval).await;
                    } else {
                        break;
                    }
                }
            }
        }

        self.publish_fault(topic, event, exceptions).await;
    }

    /// Terminal handling: wrap the original event and its exception history
    /// into a fault event. The original message is acknowledged by this and
    /// never redelivered.
    async fn publish_fault<E: Serialize>(
        &self,
        topic: &str,
        event: E,
        exceptions: Vec<ErrorDescriptor>,
    ) {
        let fault_topic = format!("{}.fault", topic);

        error!(
            topic = %topic,
            attempts = exceptions.len(),
            "Handler attempts exhausted, publishing fault event"
        );

        let fault = Fault::new(event, exceptions);
        let payload = match serde_json::to_vec(&fault) {
            Ok(payload) => payload,
            Err(e) => {
                error!(topic = %fault_topic, error = %e, "Failed to serialize fault event");
                return;
            }
        };

        if let Err(e) = self.broker.send(&fault_topic, payload).await {
            error!(topic = %fault_topic, error = %e, "Failed to publish fault event");
        }
    }
}
