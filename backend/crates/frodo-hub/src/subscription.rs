use crate::{ClientHandle, Hub};

use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;

/// The receiving side of one client's subscription.
///
/// Dropping it (or the stream made from it) unsubscribes the client exactly once.
pub struct Subscription {
    receiver: mpsc::Receiver<Arc<str>>,
    guard: SubscriptionGuard,
}

/// Unsubscribes its client when dropped
pub struct SubscriptionGuard {
    hub: Hub,
    client: ClientHandle,
}

impl Subscription {
    pub(crate) fn new(hub: Hub, client: ClientHandle, receiver: mpsc::Receiver<Arc<str>>) -> Self {
        Self {
            receiver,
            guard: SubscriptionGuard { hub, client },
        }
    }

    pub fn client(&self) -> &ClientHandle {
        &self.guard.client
    }

    /// Next payload, or `None` once the hub has released this client
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.receiver.recv().await
    }

    /// Next payload if one is already queued
    pub fn try_recv(&mut self) -> Option<Arc<str>> {
        self.receiver.try_recv().ok()
    }

    /// Turn the subscription into a stream of payloads that owns the guard
    pub fn into_stream(self) -> impl Stream<Item = Arc<str>> + Send + 'static {
        futures::stream::unfold(self, |mut subscription| async move {
            let payload = subscription.receiver.recv().await?;
            Some((payload, subscription))
        })
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.hub.unsubscribe(&self.client);
    }
}
