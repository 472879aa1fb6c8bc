use crate::Result as HubErrorResult;

use async_trait::async_trait;

/// Durable last-message storage the hub reads on channel creation and writes
/// on every publish.
///
/// Failures are reported to the hub, which logs them and carries on.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Last stored payload for a channel, if any
    async fn load(&self, channel: &str) -> HubErrorResult<Option<String>>;

    /// Persist the latest payload for a channel
    async fn save(&self, channel: &str, payload: &str) -> HubErrorResult<()>;
}

/// Store that remembers nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStore;

#[async_trait]
impl MessageStore for NullStore {
    async fn load(&self, _channel: &str) -> HubErrorResult<Option<String>> {
        Ok(None)
    }

    async fn save(&self, _channel: &str, _payload: &str) -> HubErrorResult<()> {
        Ok(())
    }
}
