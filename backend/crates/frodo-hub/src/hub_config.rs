use std::time::Duration;

/// Configuration for subscriber sinks
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Payloads buffered per client before writes start waiting
    pub client_buffer_size: usize,
    /// Longest a single write may wait for buffer space before the client is dropped
    pub write_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            client_buffer_size: 64,
            write_timeout: Duration::from_secs(5),
        }
    }
}
