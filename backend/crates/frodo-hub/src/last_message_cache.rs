use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
struct CachedMessage {
    payload: Arc<str>,
    version: u64,
}

/// In-memory copy of the most recent payload per channel.
///
/// Entries are never pruned when a channel loses its last subscriber. Every
/// write bumps a version so a store read that started before a publish can
/// detect that it is stale.
#[derive(Debug, Default)]
pub struct LastMessageCache {
    entries: HashMap<String, CachedMessage>,
    next_version: u64,
}

impl LastMessageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditional overwrite; returns the version assigned to the entry
    pub fn set(&mut self, channel: &str, payload: Arc<str>) -> u64 {
        self.next_version += 1;
        let version = self.next_version;

        self.entries
            .insert(channel.to_string(), CachedMessage { payload, version });

        version
    }

    pub fn get(&self, channel: &str) -> Option<Arc<str>> {
        self.entries.get(channel).map(|m| Arc::clone(&m.payload))
    }

    /// Version of the current entry, 0 when there is none
    pub fn version(&self, channel: &str) -> u64 {
        self.entries.get(channel).map(|m| m.version).unwrap_or(0)
    }

    /// Write a value loaded from the store, unless the entry changed since
    /// `seen_version` was read.
    pub fn prime(&mut self, channel: &str, payload: Arc<str>, seen_version: u64) -> bool {
        if self.version(channel) != seen_version {
            return false;
        }

        self.set(channel, payload);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
