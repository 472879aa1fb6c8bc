use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

// Write timeout constraints (milliseconds)
pub const MIN_WRITE_TIMEOUT_MS: u64 = 10;
pub const MAX_WRITE_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 5_000;

// Per-client buffer constraints (messages)
pub const MIN_CLIENT_BUFFER_SIZE: usize = 1;
pub const MAX_CLIENT_BUFFER_SIZE: usize = 10_000;
pub const DEFAULT_CLIENT_BUFFER_SIZE: usize = 64;

// Keep-alive comment interval constraints (seconds)
pub const MIN_KEEP_ALIVE_SECS: u64 = 1;
pub const MAX_KEEP_ALIVE_SECS: u64 = 300;
pub const DEFAULT_KEEP_ALIVE_SECS: u64 = 15;

/// Settings for SSE subscribers.
/// All values validated to be within reasonable operational ranges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Longest a write may wait on a full client buffer before the client is dropped
    pub write_timeout_ms: u64,
    /// Messages queued per client
    pub client_buffer_size: usize,
    /// Interval between keep-alive comments
    pub keep_alive_secs: u64,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            write_timeout_ms: DEFAULT_WRITE_TIMEOUT_MS,
            client_buffer_size: DEFAULT_CLIENT_BUFFER_SIZE,
            keep_alive_secs: DEFAULT_KEEP_ALIVE_SECS,
        }
    }
}

impl StreamingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !(MIN_WRITE_TIMEOUT_MS..=MAX_WRITE_TIMEOUT_MS).contains(&self.write_timeout_ms) {
            return Err(ConfigError::streaming(format!(
                "streaming.write_timeout_ms must be {}-{}, got {}",
                MIN_WRITE_TIMEOUT_MS, MAX_WRITE_TIMEOUT_MS, self.write_timeout_ms
            )));
        }

        if !(MIN_CLIENT_BUFFER_SIZE..=MAX_CLIENT_BUFFER_SIZE).contains(&self.client_buffer_size) {
            return Err(ConfigError::streaming(format!(
                "streaming.client_buffer_size must be {}-{}, got {}",
                MIN_CLIENT_BUFFER_SIZE, MAX_CLIENT_BUFFER_SIZE, self.client_buffer_size
            )));
        }

        if !(MIN_KEEP_ALIVE_SECS..=MAX_KEEP_ALIVE_SECS).contains(&self.keep_alive_secs) {
            return Err(ConfigError::streaming(format!(
                "streaming.keep_alive_secs must be {}-{}, got {}",
                MIN_KEEP_ALIVE_SECS, MAX_KEEP_ALIVE_SECS, self.keep_alive_secs
            )));
        }

        Ok(())
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }
}
