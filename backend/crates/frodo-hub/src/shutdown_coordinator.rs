use crate::ShutdownGuard;

use std::sync::Arc;

use tokio::sync::watch;

/// Process-wide shutdown signal.
///
/// Built on a watch channel so guards created after the signal still see it.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            shutdown_tx: Arc::new(shutdown_tx),
        }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Trigger shutdown (call this from signal handler)
    pub fn shutdown(&self) {
        if !self.shutdown_tx.send_replace(true) {
            log::info!("Shutdown signal received, notifying all subsystems");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }

    pub fn subscribe_guard(&self) -> ShutdownGuard {
        ShutdownGuard::new(self)
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
