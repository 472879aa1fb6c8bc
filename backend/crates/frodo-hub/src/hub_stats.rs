use std::collections::HashMap;

use serde::Serialize;

/// Subscriber count of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub client_count: usize,
}

/// Connection counts derived from one registry snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubStats {
    pub channel_count: usize,
    pub client_count: usize,
    pub channels: HashMap<String, ChannelStats>,
}

impl HubStats {
    /// Build stats from `(channel, client_count)` pairs copied out of the registry
    pub fn from_counts(counts: Vec<(String, usize)>) -> Self {
        let client_count = counts.iter().map(|(_, count)| count).sum();
        let channels: HashMap<String, ChannelStats> = counts
            .into_iter()
            .map(|(name, client_count)| (name, ChannelStats { client_count }))
            .collect();

        Self {
            channel_count: channels.len(),
            client_count,
            channels,
        }
    }
}
