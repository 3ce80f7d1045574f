//! Fault events wrapping messages that exhausted their retry budget.

use crate::error::{FailureKind, HandlerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal failure report for one original message.
///
/// Published to `<topic>.fault` when the dispatcher gives up on a message.
/// The original message travels unchanged so a compensator can reconstruct
/// and republish a corrected copy; the descriptors record every attempt's
/// failure in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fault<M> {
    /// The original message, unchanged
    pub message: M,
    /// One descriptor per failed attempt, in attempt order
    pub exceptions: Vec<ErrorDescriptor>,
    /// When the dispatcher declared the message faulted
    pub faulted_at: DateTime<Utc>,
}

impl<M> Fault<M> {
    /// Wrap a message with its recorded failures.
    pub fn new(message: M, exceptions: Vec<ErrorDescriptor>) -> Self {
        Self {
            message,
            exceptions,
            faulted_at: Utc::now(),
        }
    }

    /// The failure recorded on the first attempt.
    ///
    /// Compensation decisions look at this one; later attempts usually
    /// repeat the same cause.
    pub fn first_exception(&self) -> Option<&ErrorDescriptor> {
        self.exceptions.first()
    }

    /// Take ownership of the original message.
    pub fn into_message(self) -> M {
        self.message
    }
}

/// One recorded handler failure: structural kind plus human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub kind: FailureKind,
    pub message: String,
}

impl ErrorDescriptor {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<&HandlerError> for ErrorDescriptor {
    fn from(err: &HandlerError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Ping {
        id: Uuid,
    }

    #[test]
    fn test_fault_keeps_original_message() {
        let ping = Ping { id: Uuid::new_v4() };
        let fault = Fault::new(
            ping.clone(),
            vec![ErrorDescriptor::new(FailureKind::Transient, "timeout")],
        );

        assert_eq!(fault.message, ping);
        assert_eq!(fault.into_message(), ping);
    }

    #[test]
    fn test_first_exception() {
        let fault = Fault::new(
            Ping { id: Uuid::new_v4() },
            vec![
                ErrorDescriptor::new(FailureKind::Validation, "empty model"),
                ErrorDescriptor::new(FailureKind::Transient, "timeout"),
            ],
        );

        let first = fault.first_exception().unwrap();
        assert_eq!(first.kind, FailureKind::Validation);
        assert_eq!(first.message, "empty model");
    }

    #[test]
    fn test_first_exception_empty() {
        let fault: Fault<Ping> = Fault::new(Ping { id: Uuid::new_v4() }, vec![]);
        assert!(fault.first_exception().is_none());
    }

    #[test]
    fn test_fault_round_trips_as_json() {
        let fault = Fault::new(
            Ping { id: Uuid::new_v4() },
            vec![ErrorDescriptor::new(FailureKind::Unknown, "boom")],
        );

        let json = serde_json::to_vec(&fault).unwrap();
        let back: Fault<Ping> = serde_json::from_slice(&json).unwrap();

        assert_eq!(back.message, fault.message);
        assert_eq!(back.exceptions, fault.exceptions);
    }

    #[test]
    fn test_descriptor_from_handler_error() {
        let descriptor = ErrorDescriptor::from(&HandlerError::validation("bad year"));
        assert_eq!(descriptor.kind, FailureKind::Validation);
        assert!(descriptor.message.contains("bad year"));
    }
}
