mod channel_registry;
mod dispatcher;
mod property_tests;
mod stats;

use crate::{ChannelName, Hub, HubConfig, HubError, MessageStore, Metrics, Result};

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

/// In-memory stand-in for the persistent store
#[derive(Default)]
pub(crate) struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
    load_delay: Mutex<Option<Duration>>,
}

impl MemoryStore {
    pub(crate) fn with_value(channel: &str, payload: &str) -> Self {
        let store = Self::default();
        store.put(channel, payload);
        store
    }

    pub(crate) fn put(&self, channel: &str, payload: &str) {
        self.values
            .lock()
            .unwrap()
            .insert(channel.to_string(), payload.to_string());
    }

    pub(crate) fn value(&self, channel: &str) -> Option<String> {
        self.values.lock().unwrap().get(channel).cloned()
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn set_load_delay(&self, delay: Duration) {
        *self.load_delay.lock().unwrap() = Some(delay);
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn load(&self, channel: &str) -> Result<Option<String>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HubError::store("store unreachable"));
        }

        // Read first, then stall, to mimic a reply that is stale on arrival
        let value = self.value(channel);
        let delay = *self.load_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(value)
    }

    async fn save(&self, channel: &str, payload: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(HubError::store("store unreachable"));
        }
        self.put(channel, payload);
        Ok(())
    }
}

pub(crate) fn test_hub(store: Arc<MemoryStore>) -> Hub {
    test_hub_with_config(store, HubConfig::default())
}

pub(crate) fn test_hub_with_config(store: Arc<MemoryStore>, config: HubConfig) -> Hub {
    Hub::new(config, store, Metrics::new())
}

pub(crate) fn channel(name: &str) -> ChannelName {
    ChannelName::parse(name).unwrap()
}
