//! Retry schedule for transient handler failures.

use std::time::Duration;

/// Flat-interval bounded retry schedule.
///
/// A message gets `max_attempts` handler invocations total, with `interval`
/// between them — deliberately not exponential: the flat interval absorbs
/// transient broker/network blips without stretching out the window in
/// which a genuinely broken message occupies the consumer.
///
/// The attempt counter lives in the dispatcher and is scoped to one
/// message's processing; broker-level redelivery never feeds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total handler attempts before declaring the message faulted
    pub max_attempts: u32,
    /// Flat delay between attempts
    pub interval: Duration,
}

impl RetryPolicy {
    /// A policy always grants at least one attempt; zero is clamped to 1
    /// (a message that is never handled could only fault with an empty
    /// exception list).
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    /// Whether another attempt remains after `attempt` (1-based) failed.
    pub fn has_attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    /// 5 attempts, 10 seconds apart.
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_secs(10),
        }
    }
}
