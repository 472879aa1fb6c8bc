use crate::{ClientConnection, ClientId};

use std::collections::HashMap;

/// Outcome of removing a client from the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Client was not subscribed; nothing changed
    NotSubscribed,
    /// Client removed, other subscribers remain on the channel
    Removed { remaining: usize },
    /// Client removed and the now empty channel was deleted
    ChannelRemoved,
}

/// Mapping from channel name to its current subscribers.
///
/// A channel is present if and only if it has at least one subscriber.
/// Not synchronised on its own; the hub owns it behind a lock.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, HashMap<ClientId, ClientConnection>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.channels.contains_key(channel)
    }

    /// Add a client to its channel, creating the channel if needed.
    ///
    /// Returns true when this call created the channel.
    pub fn subscribe(&mut self, client: ClientConnection) -> bool {
        let mut created = false;
        let subscribers = self
            .channels
            .entry(client.channel().to_string())
            .or_insert_with(|| {
                created = true;
                HashMap::new()
            });

        subscribers.insert(client.id(), client);
        created
    }

    /// Remove a client. Removing a client that is not present is a no-op.
    pub fn unsubscribe(&mut self, channel: &str, client_id: ClientId) -> Removal {
        let Some(subscribers) = self.channels.get_mut(channel) else {
            return Removal::NotSubscribed;
        };

        if subscribers.remove(&client_id).is_none() {
            return Removal::NotSubscribed;
        }

        if subscribers.is_empty() {
            self.channels.remove(channel);
            Removal::ChannelRemoved
        } else {
            Removal::Removed {
                remaining: subscribers.len(),
            }
        }
    }

    /// Current channel names, detached from the registry
    pub fn channels(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    pub fn connection_count_per_channel(&self, channel: &str) -> usize {
        self.channels.get(channel).map(HashMap::len).unwrap_or(0)
    }

    pub fn connection_count(&self) -> usize {
        self.channels.values().map(HashMap::len).sum()
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Per-channel subscriber counts, copied out in one pass
    pub fn counts(&self) -> Vec<(String, usize)> {
        self.channels
            .iter()
            .map(|(name, subscribers)| (name.clone(), subscribers.len()))
            .collect()
    }

    /// Copy of the subscribers of one channel, safe to use after the lock is released
    pub fn snapshot(&self, channel: &str) -> Vec<ClientConnection> {
        self.channels
            .get(channel)
            .map(|subscribers| subscribers.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Remove every channel, handing back all subscribers
    pub fn drain(&mut self) -> Vec<ClientConnection> {
        self.channels
            .drain()
            .flat_map(|(_, subscribers)| subscribers.into_values())
            .collect()
    }
}
