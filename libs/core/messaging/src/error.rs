//! Error taxonomy for publishing and consuming events.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed enumeration of handler failure kinds.
///
/// Matched structurally by the retry policy and the fault compensator; no
/// exception-type-name strings cross the wire.
///
/// - **Transient**: connectivity or timeout, consumes the retry budget
/// - **Validation**: malformed event content, candidate for compensation
/// - **Unknown**: anything else, reported but never auto-corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transient,
    Validation,
    Unknown,
}

impl FailureKind {
    /// Whether a failure of this kind consumes the retry budget.
    ///
    /// Validation and unknown failures are deterministic; retrying them
    /// only delays the fault event.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FailureKind::Transient)
    }

    /// Whether the fault compensator knows how to patch and republish a
    /// message that failed with this kind.
    pub fn is_correctable(&self) -> bool {
        matches!(self, FailureKind::Validation)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transient => write!(f, "transient"),
            FailureKind::Validation => write!(f, "validation"),
            FailureKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error returned by an [`EventHandler`](crate::EventHandler).
///
/// The kind decides what the dispatcher does next: transient errors are
/// retried on the flat schedule, everything else faults on the first
/// attempt.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Temporary failure (network, timeout, backend unavailable)
    #[error("transient error: {message}")]
    Transient {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed or rejected event content
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Unclassified handler failure
    #[error("handler error: {message}")]
    Unknown {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HandlerError {
    /// Create a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transient error with a source.
    pub fn transient_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transient {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unknown error.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown {
            message: message.into(),
            source: None,
        }
    }

    /// Get the failure kind.
    pub fn kind(&self) -> FailureKind {
        match self {
            HandlerError::Transient { .. } => FailureKind::Transient,
            HandlerError::Validation { .. } => FailureKind::Validation,
            HandlerError::Unknown { .. } => FailureKind::Unknown,
        }
    }
}

/// Error from the broker client.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// The broker could not be reached
    #[error("broker unavailable: {0}")]
    Unavailable(String),

    /// Subscribing to a topic failed
    #[error("subscribe failed for '{topic}': {details}")]
    Subscribe { topic: String, details: String },

    /// The client has been closed
    #[error("broker client is closed")]
    Closed,
}

/// Error surfaced synchronously to the publishing caller.
///
/// The caller's local mutation has already committed when publish runs, so
/// an `Unavailable` here is an accepted bounded-inconsistency window, not a
/// rollback trigger. There is no outbox; the caller decides whether to
/// alert or ignore.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The broker was unreachable at publish time
    #[error("delivery unavailable: {0}")]
    Unavailable(#[from] BrokerError),

    /// The event could not be serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_retry() {
        assert!(FailureKind::Transient.is_retryable());
        assert!(!FailureKind::Validation.is_retryable());
        assert!(!FailureKind::Unknown.is_retryable());
    }

    #[test]
    fn test_failure_kind_correctable() {
        assert!(FailureKind::Validation.is_correctable());
        assert!(!FailureKind::Transient.is_correctable());
        assert!(!FailureKind::Unknown.is_correctable());
    }

    #[test]
    fn test_failure_kind_serialization() {
        let json = serde_json::to_string(&FailureKind::Validation).unwrap();
        assert_eq!(json, "\"validation\"");

        let kind: FailureKind = serde_json::from_str("\"transient\"").unwrap();
        assert_eq!(kind, FailureKind::Transient);
    }

    #[test]
    fn test_handler_error_kind() {
        assert_eq!(
            HandlerError::transient("timeout").kind(),
            FailureKind::Transient
        );
        assert_eq!(
            HandlerError::validation("empty model").kind(),
            FailureKind::Validation
        );
        assert_eq!(
            HandlerError::unknown("boom").kind(),
            FailureKind::Unknown
        );
    }

    #[test]
    fn test_handler_error_display() {
        let err = HandlerError::transient("connection refused");
        assert_eq!(err.to_string(), "transient error: connection refused");
    }
}
