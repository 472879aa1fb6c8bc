use crate::{BrokerStatus, CacheStatus};

use frodo_hub::{Hub, ShutdownCoordinator};

use std::sync::Arc;
use std::time::Duration;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub hub: Hub,
    pub cache: Arc<dyn CacheStatus>,
    pub broker: Arc<dyn BrokerStatus>,
    pub shutdown: ShutdownCoordinator,
    /// Interval between SSE keep-alive comments
    pub keep_alive: Duration,
}
