use crate::{
    ChannelName, ChannelRegistry, ClientConnection, ClientHandle, HubConfig, HubError, HubStats,
    LastMessageCache, MessageStore, Metrics, PublishReport, Removal, Result as HubErrorResult,
    Subscription,
};

use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use error_location::ErrorLocation;
use futures::future::join_all;
use log::{debug, info, warn};

/// In-process broadcast hub: channel registry, last-message cache and fan-out.
///
/// Constructed once at startup and shared by cloning; all clones refer to the
/// same state. The registry and cache live behind one lock that is only ever
/// held for in-memory work, never across a store call or a client write.
pub struct Hub {
    inner: Arc<HubInner>,
}

struct HubInner {
    state: RwLock<HubState>,
    store: Arc<dyn MessageStore>,
    config: HubConfig,
    metrics: Metrics,
    closed: AtomicBool,
}

struct HubState {
    registry: ChannelRegistry,
    cache: LastMessageCache,
}

impl Hub {
    pub fn new(config: HubConfig, store: Arc<dyn MessageStore>, metrics: Metrics) -> Self {
        Self {
            inner: Arc::new(HubInner {
                state: RwLock::new(HubState {
                    registry: ChannelRegistry::new(),
                    cache: LastMessageCache::new(),
                }),
                store,
                config,
                metrics,
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Subscribe a new client to a channel.
    ///
    /// If the channel does not exist yet, the last message is first loaded from
    /// the store. The cached last message, if any, is queued for this client
    /// alone before the subscription is returned.
    pub async fn subscribe(&self, channel: ChannelName) -> HubErrorResult<Subscription> {
        self.ensure_open()?;

        let (exists, seen_version) = {
            let state = self.read_state();
            (
                state.registry.contains(&channel),
                state.cache.version(&channel),
            )
        };

        if !exists {
            self.prime_from_store(&channel, seen_version).await;
        }

        let (client, receiver) = ClientConnection::new(
            channel.clone(),
            self.inner.config.client_buffer_size,
            self.inner.config.write_timeout,
        );

        let (created, replayed, client_count) = {
            let mut state = self.write_state();

            // Checked under the lock so close() cannot miss this client
            self.ensure_open()?;

            let created = state.registry.subscribe(client.clone());
            client.activate();

            // Queued while the lock is held so no publish can overtake the replay
            let replayed = match state.cache.get(&channel) {
                Some(payload) => match client.try_send_message(payload) {
                    Ok(()) => true,
                    Err(e) => {
                        warn!("Failed to replay last message to client {}: {e}", client.id());
                        false
                    }
                },
                None => false,
            };

            (
                created,
                replayed,
                state.registry.connection_count_per_channel(&channel),
            )
        };

        if created {
            info!("Created channel {channel}");
            self.inner.metrics.channel_created();
        }

        if replayed {
            debug!("Sent last message to new client {} on {channel}", client.id());
            self.inner.metrics.last_message_replayed();
        }

        self.inner.metrics.client_connected();
        info!(
            "Client {} subscribed to {channel} ({client_count} on channel)",
            client.id()
        );

        Ok(Subscription::new(self.clone(), client.handle().clone(), receiver))
    }

    /// Remove a client from its channel.
    ///
    /// Safe to call any number of times and from racing tasks: only the first
    /// call for a given client does anything. Returns whether this call removed it.
    pub fn unsubscribe(&self, client: &ClientHandle) -> bool {
        self.remove_client(client, "disconnect")
    }

    /// Publish a payload to every current subscriber of a channel.
    ///
    /// Callers must not overlap publishes to the same channel; the
    /// [`Dispatcher`](crate::Dispatcher) provides that ordering.
    pub async fn publish(&self, channel: &str, payload: impl Into<Arc<str>>) -> PublishReport {
        let payload: Arc<str> = payload.into();
        let started = Instant::now();

        // Cache update and snapshot are one step so a concurrent subscriber
        // gets the payload either by replay or by fan-out, never both.
        let subscribers = {
            let mut state = self.write_state();
            state.cache.set(channel, Arc::clone(&payload));
            state.registry.snapshot(channel)
        };

        if let Err(e) = self.inner.store.save(channel, &payload).await {
            warn!("Failed to store last message for {channel}: {e}");
            self.inner.metrics.store_failed("save");
        }

        let results = join_all(
            subscribers
                .iter()
                .map(|client| client.send_message(Arc::clone(&payload))),
        )
        .await;

        let mut report = PublishReport::default();

        for (client, result) in subscribers.iter().zip(results) {
            match result {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    debug!("Send to client {} on {channel} failed: {e}", client.id());
                    self.inner.metrics.send_failed(e.kind());

                    if self.remove_client(client.handle(), e.kind()) {
                        report.dropped += 1;
                    }
                }
            }
        }

        self.inner
            .metrics
            .message_published(report.delivered, report.dropped);
        self.inner.metrics.fanout_latency(started.elapsed());

        debug!(
            "Published to {channel}: {} delivered, {} dropped",
            report.delivered, report.dropped
        );

        report
    }

    pub fn set_last_message(&self, channel: &str, payload: impl Into<Arc<str>>) {
        self.write_state().cache.set(channel, payload.into());
    }

    pub fn get_last_message(&self, channel: &str) -> Option<Arc<str>> {
        self.read_state().cache.get(channel)
    }

    /// Snapshot of the channels that currently have subscribers
    pub fn channels(&self) -> Vec<String> {
        self.read_state().registry.channels()
    }

    pub fn connection_count(&self) -> usize {
        self.read_state().registry.connection_count()
    }

    pub fn connection_count_per_channel(&self, channel: &str) -> usize {
        self.read_state()
            .registry
            .connection_count_per_channel(channel)
    }

    /// Counts copied under one lock acquisition; the response is built after release
    pub fn stats(&self) -> HubStats {
        let counts = self.read_state().registry.counts();
        HubStats::from_counts(counts)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Stop accepting subscriptions and release every client sink.
    ///
    /// Each client's stream ends once its queued payloads are drained.
    /// Returns the number of clients released.
    pub fn close(&self) -> usize {
        self.inner.closed.store(true, Ordering::SeqCst);

        let clients = self.write_state().registry.drain();
        let mut released = 0;

        for client in &clients {
            if client.handle().begin_close() {
                client.handle().finish_close();
                self.inner.metrics.client_disconnected("shutdown");
                released += 1;
            }
        }

        info!("Hub closed, released {released} clients");
        released
    }

    fn remove_client(&self, client: &ClientHandle, reason: &str) -> bool {
        if !client.begin_close() {
            return false;
        }

        let removal = self
            .write_state()
            .registry
            .unsubscribe(client.channel(), client.id());

        client.finish_close();

        match removal {
            Removal::NotSubscribed => {
                debug!("Client {} was not subscribed", client.id());
                return false;
            }
            Removal::Removed { remaining } => {
                info!(
                    "Client {} left {} ({remaining} remaining, {reason})",
                    client.id(),
                    client.channel()
                );
            }
            Removal::ChannelRemoved => {
                info!(
                    "Client {} left {} ({reason}), channel removed",
                    client.id(),
                    client.channel()
                );
                self.inner.metrics.channel_removed();
            }
        }

        self.inner.metrics.client_disconnected(reason);
        true
    }

    async fn prime_from_store(&self, channel: &ChannelName, seen_version: u64) {
        match self.inner.store.load(channel).await {
            Ok(Some(payload)) => {
                let primed = self
                    .write_state()
                    .cache
                    .prime(channel, payload.into(), seen_version);

                if primed {
                    info!("Loaded last message for {channel} from store");
                } else {
                    debug!("Skipped stale stored message for {channel}");
                }
            }
            Ok(None) => debug!("No stored message for {channel}"),
            Err(e) => {
                warn!("Failed to load last message for {channel}: {e}");
                self.inner.metrics.store_failed("load");
            }
        }
    }

    #[track_caller]
    fn ensure_open(&self) -> HubErrorResult<()> {
        if self.is_closed() {
            return Err(HubError::HubClosed {
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }

    fn read_state(&self) -> RwLockReadGuard<'_, HubState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, HubState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for Hub {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
