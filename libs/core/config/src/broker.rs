use crate::{env_or_default, ConfigError, FromEnv};
use std::time::Duration;

/// Broker connection and retry settings for event consumers.
///
/// The retry values configure the dispatcher's in-handler retry schedule,
/// not broker-level redelivery: a flat interval repeated up to the maximum
/// attempt count.
#[derive(Clone, Debug)]
pub struct BrokerConfig {
    /// Broker URL (NATS)
    pub url: String,
    /// Consumer group this process joins
    pub group: String,
    /// Total handler attempts before a message is declared faulted
    pub retry_max_attempts: u32,
    /// Flat delay between handler attempts
    pub retry_interval: Duration,
}

impl FromEnv for BrokerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - NATS_URL: defaults to nats://localhost:4222
    /// - CONSUMER_GROUP: defaults to "workers"
    /// - RETRY_MAX_ATTEMPTS: defaults to 5
    /// - RETRY_INTERVAL_SECS: defaults to 10
    fn from_env() -> Result<Self, ConfigError> {
        let url = env_or_default("NATS_URL", "nats://localhost:4222");
        let group = env_or_default("CONSUMER_GROUP", "workers");

        let retry_max_attempts = env_or_default("RETRY_MAX_ATTEMPTS", "5")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "RETRY_MAX_ATTEMPTS".to_string(),
                details: format!("{}", e),
            })?;

        let retry_interval_secs: u64 = env_or_default("RETRY_INTERVAL_SECS", "10")
            .parse()
            .map_err(|e| ConfigError::ParseError {
                key: "RETRY_INTERVAL_SECS".to_string(),
                details: format!("{}", e),
            })?;

        Ok(Self {
            url,
            group,
            retry_max_attempts,
            retry_interval: Duration::from_secs(retry_interval_secs),
        })
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: "nats://localhost:4222".to_string(),
            group: "workers".to_string(),
            retry_max_attempts: 5,
            retry_interval: Duration::from_secs(10),
        }
    }
}
