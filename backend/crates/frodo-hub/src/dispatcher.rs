use crate::{Hub, HubError, Result as HubErrorResult};

use std::collections::HashMap;
use std::panic::Location;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use error_location::ErrorLocation;
use log::{debug, info, warn};
use tokio::sync::mpsc::{self, error::SendError, error::TryRecvError, error::TrySendError};
use tokio::task::JoinSet;

/// Payloads a lane holds before `dispatch` starts waiting for room
pub const DEFAULT_LANE_CAPACITY: usize = 256;

/// Ordered entry point for upstream messages.
///
/// Every channel gets its own lane: a bounded queue drained by one task that
/// runs publishes to completion in arrival order. Lanes of different channels
/// run concurrently. A drained lane retires itself.
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    hub: Hub,
    lane_capacity: usize,
    lanes: Mutex<Lanes>,
}

struct Lanes {
    accepting: bool,
    queues: HashMap<String, mpsc::Sender<Arc<str>>>,
    tasks: JoinSet<()>,
}

enum Enqueued {
    Queued,
    /// The lane is full; the payload still has to be sent on this queue
    Full(mpsc::Sender<Arc<str>>, Arc<str>),
}

impl Dispatcher {
    pub fn new(hub: Hub) -> Self {
        Self::with_lane_capacity(hub, DEFAULT_LANE_CAPACITY)
    }

    pub fn with_lane_capacity(hub: Hub, lane_capacity: usize) -> Self {
        Self {
            inner: Arc::new(DispatcherInner {
                hub,
                lane_capacity: lane_capacity.max(1),
                lanes: Mutex::new(Lanes {
                    accepting: true,
                    queues: HashMap::new(),
                    tasks: JoinSet::new(),
                }),
            }),
        }
    }

    /// Queue a payload for a channel without waiting for delivery.
    ///
    /// Waits only while the channel's lane is full. Callers that need
    /// ordering must await each dispatch before starting the next one.
    pub async fn dispatch(
        &self,
        channel: &str,
        payload: impl Into<Arc<str>>,
    ) -> HubErrorResult<()> {
        let mut payload: Arc<str> = payload.into();

        loop {
            let (queue, pending) = match self.enqueue(channel, payload)? {
                Enqueued::Queued => return Ok(()),
                Enqueued::Full(queue, pending) => (queue, pending),
            };

            debug!("Dispatch lane for {channel} is full, waiting");

            match queue.send(pending).await {
                Ok(()) => return Ok(()),
                // The lane retired while we waited; open a new one
                Err(SendError(returned)) => payload = returned,
            }
        }
    }

    /// Number of channels with queued or in-flight publishes
    pub fn active_lanes(&self) -> usize {
        self.inner.lock_lanes().queues.len()
    }

    /// Stop accepting messages and wait for every queued publish to finish
    pub async fn shutdown(&self) {
        let mut tasks = {
            let mut lanes = self.inner.lock_lanes();
            lanes.accepting = false;
            std::mem::take(&mut lanes.tasks)
        };

        info!("Draining {} dispatch lanes", tasks.len());

        while let Some(result) = tasks.join_next().await {
            if let Err(e) = result {
                warn!("Dispatch lane ended abnormally: {e}");
            }
        }
    }
}

impl Dispatcher {
    fn enqueue(&self, channel: &str, payload: Arc<str>) -> HubErrorResult<Enqueued> {
        let mut lanes = self.inner.lock_lanes();

        if !lanes.accepting {
            return Err(HubError::HubClosed {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        while lanes.tasks.try_join_next().is_some() {}

        // A lane only retires while holding this lock, so a present queue has a live receiver
        let payload = match lanes.queues.get(channel) {
            Some(queue) => match queue.try_send(payload) {
                Ok(()) => return Ok(Enqueued::Queued),
                Err(TrySendError::Full(payload)) => {
                    return Ok(Enqueued::Full(queue.clone(), payload));
                }
                Err(TrySendError::Closed(payload)) => payload,
            },
            None => payload,
        };

        let (queue, receiver) = mpsc::channel(self.inner.lane_capacity);
        // A fresh queue always has room
        let _ = queue.try_send(payload);
        lanes.queues.insert(channel.to_string(), queue);
        lanes.tasks.spawn(run_lane(
            Arc::clone(&self.inner),
            channel.to_string(),
            receiver,
        ));

        debug!("Opened dispatch lane for {channel}");
        Ok(Enqueued::Queued)
    }
}

impl DispatcherInner {
    fn lock_lanes(&self) -> MutexGuard<'_, Lanes> {
        self.lanes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clone for Dispatcher {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

async fn run_lane(
    inner: Arc<DispatcherInner>,
    channel: String,
    mut receiver: mpsc::Receiver<Arc<str>>,
) {
    loop {
        match receiver.try_recv() {
            Ok(payload) => {
                inner.hub.publish(&channel, payload).await;
            }
            Err(TryRecvError::Empty) => {
                let mut lanes = inner.lock_lanes();
                if receiver.is_empty() {
                    lanes.queues.remove(&channel);
                    debug!("Closed dispatch lane for {channel}");
                    return;
                }
            }
            Err(TryRecvError::Disconnected) => return,
        }
    }
}
