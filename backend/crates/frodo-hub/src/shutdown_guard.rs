use crate::ShutdownCoordinator;

use tokio::sync::watch;

/// Helper for gracefully handling shutdown in async tasks
pub struct ShutdownGuard {
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownGuard {
    pub fn new(coordinator: &ShutdownCoordinator) -> Self {
        Self {
            shutdown_rx: coordinator.subscribe(),
        }
    }

    /// Wait for shutdown signal; returns immediately if it was already sent
    pub async fn wait(&mut self) {
        let _ = self.shutdown_rx.wait_for(|shutdown| *shutdown).await;
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_rx.borrow()
    }
}
