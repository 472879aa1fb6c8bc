use crate::{ConfigError, ConfigErrorResult, DEFAULT_BROKER_QUEUE, DEFAULT_BROKER_URL};

use serde::Deserialize;

/// Upstream AMQP source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub url: String,
    /// Name of the fanout exchange this node binds its private queue to
    pub queue: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_BROKER_URL),
            queue: String::from(DEFAULT_BROKER_QUEUE),
        }
    }
}

impl BrokerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(self.url.starts_with("amqp://") || self.url.starts_with("amqps://")) {
            return Err(ConfigError::broker(format!(
                "broker.url must start with amqp:// or amqps://, got '{}'",
                self.url
            )));
        }

        if self.queue.trim().is_empty() {
            return Err(ConfigError::broker("broker.queue must not be empty"));
        }

        Ok(())
    }
}
