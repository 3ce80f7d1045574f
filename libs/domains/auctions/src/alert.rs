//! Operator alerting for faults that cannot be compensated automatically.

use tracing::warn;

/// Destination for fault reports that need a human.
///
/// Implementations must not block and must not fail; a lost alert is
/// preferable to a compensator that errors and re-faults.
pub trait AlertSink: Send + Sync {
    fn alert(&self, report: &str);
}

/// Default sink: structured warn-level log line, picked up by whatever
/// ships the service's logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, report: &str) {
        warn!(report = %report, "Operator attention required");
    }
}
