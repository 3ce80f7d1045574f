//! Event-driven consistency core shared by all auction services.
//!
//! This library provides everything a service needs to stay consistent with
//! its peers under at-least-once delivery:
//!
//! - **Contracts**: the [`Message`] trait ties an event type to its topic
//!   and aggregate id; [`Fault`] wraps a message that could not be processed.
//! - **Broker abstraction**: the [`MessageBroker`] trait with a real NATS
//!   implementation ([`NatsBroker`]) and an in-memory fake
//!   ([`InMemoryBroker`]) for tests.
//! - **Publishing**: [`EventPublisher`] hands committed events to the broker.
//! - **Dispatch**: [`Dispatcher`] routes incoming events to an
//!   [`EventHandler`], retries transient failures on a flat schedule and
//!   converts exhaustion into a typed fault event.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────┐     ┌──────────────┐     ┌───────────────────────┐
//! │ EventPublisher │────▶│    Broker    │────▶│      Dispatcher       │
//! │ (after commit) │     │ (NATS/memory)│     │ retry ▸ ack | fault   │
//! └────────────────┘     └──────────────┘     └───────────┬───────────┘
//!                              ▲                          │
//!                              │        Fault<E> on "<topic>.fault"
//!                              └──────────────────────────┘
//! ```
//!
//! Delivery is at least once; every [`EventHandler`] must therefore be
//! idempotent. Per-aggregate order is preserved end-to-end as long as the
//! broker preserves publish order and one queue-group member runs per
//! process (the dispatcher handles messages on a subscription one at a
//! time).

mod broker;
mod dispatcher;
mod error;
mod fault;
mod memory;
mod message;
mod nats;
mod publisher;
mod retry;

pub use broker::{MessageBroker, MessageStream, ReceivedMessage};
pub use dispatcher::{Dispatcher, EventHandler};
pub use error::{BrokerError, FailureKind, HandlerError, PublishError};
pub use fault::{ErrorDescriptor, Fault};
pub use memory::InMemoryBroker;
pub use message::Message;
pub use nats::NatsBroker;
pub use publisher::EventPublisher;
pub use retry::RetryPolicy;
