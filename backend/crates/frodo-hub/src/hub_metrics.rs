use metrics::{counter, gauge, histogram};

/// Metrics collector for hub operations
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "frodo_hub" }
    }

    /// Record a subscriber joining
    pub fn client_connected(&self) {
        counter!(format!("{}.clients.connected", self.prefix)).increment(1);
        gauge!(format!("{}.clients.active", self.prefix)).increment(1.0);
    }

    /// Record a subscriber leaving, labelled by why
    pub fn client_disconnected(&self, reason: &str) {
        counter!(format!("{}.clients.disconnected", self.prefix)).increment(1);
        counter!(format!("{}.clients.disconnected.{}", self.prefix, reason)).increment(1);
        gauge!(format!("{}.clients.active", self.prefix)).decrement(1.0);
    }

    pub fn channel_created(&self) {
        counter!(format!("{}.channels.created", self.prefix)).increment(1);
        gauge!(format!("{}.channels.active", self.prefix)).increment(1.0);
    }

    pub fn channel_removed(&self) {
        counter!(format!("{}.channels.removed", self.prefix)).increment(1);
        gauge!(format!("{}.channels.active", self.prefix)).decrement(1.0);
    }

    pub fn last_message_replayed(&self) {
        counter!(format!("{}.replays", self.prefix)).increment(1);
    }

    /// Record one publish pass
    pub fn message_published(&self, delivered: usize, dropped: usize) {
        counter!(format!("{}.messages.published", self.prefix)).increment(1);
        counter!(format!("{}.messages.delivered", self.prefix)).increment(delivered as u64);
        if dropped > 0 {
            counter!(format!("{}.messages.dropped", self.prefix)).increment(dropped as u64);
        }
    }

    pub fn send_failed(&self, error_kind: &str) {
        counter!(format!("{}.errors.send", self.prefix)).increment(1);
        counter!(format!("{}.errors.send.{}", self.prefix, error_kind)).increment(1);
    }

    pub fn store_failed(&self, operation: &str) {
        counter!(format!("{}.errors.store.{}", self.prefix, operation)).increment(1);
    }

    /// Record how long one fan-out took
    pub fn fanout_latency(&self, duration: std::time::Duration) {
        histogram!(format!("{}.fanout.latency_ms", self.prefix))
            .record(duration.as_millis() as f64);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
