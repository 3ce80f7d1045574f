//! Message trait for published event contracts.

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A published event contract.
///
/// Every event names the topic it travels on and the aggregate it belongs
/// to. The aggregate id is generated once by the owning service and never
/// reused; all derived stores key their records by it.
///
/// # Example
///
/// ```rust
/// use messaging::Message;
/// use serde::{Deserialize, Serialize};
/// use uuid::Uuid;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct OrderPlaced {
///     id: Uuid,
///     total: i64,
/// }
///
/// impl Message for OrderPlaced {
///     const TOPIC: &'static str = "order.placed";
///
///     fn aggregate_id(&self) -> Uuid {
///         self.id
///     }
/// }
///
/// assert_eq!(OrderPlaced::fault_topic(), "order.placed.fault");
/// ```
pub trait Message: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Topic the event is published on.
    const TOPIC: &'static str;

    /// Stable identifier of the aggregate this event mutates.
    fn aggregate_id(&self) -> Uuid;

    /// Topic that carries `Fault<Self>` events after retry exhaustion.
    fn fault_topic() -> String {
        format!("{}.fault", Self::TOPIC)
    }
}
