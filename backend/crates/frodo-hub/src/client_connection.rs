use crate::client_state::ClientLifecycle;
use crate::{ChannelName, ClientId, ClientState, HubError, Result as HubErrorResult};

use std::future::Future;
use std::panic::Location;
use std::sync::Arc;
use std::time::Duration;

use error_location::ErrorLocation;
use tokio::sync::mpsc::{self, error::SendTimeoutError, error::TrySendError};

/// One streaming subscriber bound to a single channel.
///
/// The sink is the sending half of a bounded queue whose receiver feeds the
/// transport's response stream. Clones share identity and lifecycle state.
#[derive(Debug, Clone)]
pub struct ClientConnection {
    handle: ClientHandle,
    sink: mpsc::Sender<Arc<str>>,
    write_timeout: Duration,
}

/// Identity and lifecycle of a client without its sink.
///
/// Holding a handle never keeps the client's stream open.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ClientId,
    channel: ChannelName,
    lifecycle: Arc<ClientLifecycle>,
}

impl ClientConnection {
    /// Create a connection in the `Connecting` state, returning the receiving
    /// end the transport should drain.
    pub fn new(
        channel: ChannelName,
        buffer_size: usize,
        write_timeout: Duration,
    ) -> (Self, mpsc::Receiver<Arc<str>>) {
        let (sink, receiver) = mpsc::channel(buffer_size.max(1));
        let connection = Self {
            handle: ClientHandle {
                id: ClientId::new(),
                channel,
                lifecycle: Arc::new(ClientLifecycle::new()),
            },
            sink,
            write_timeout,
        };

        (connection, receiver)
    }

    pub fn id(&self) -> ClientId {
        self.handle.id
    }

    pub fn channel(&self) -> &ChannelName {
        &self.handle.channel
    }

    pub fn state(&self) -> ClientState {
        self.handle.state()
    }

    pub fn handle(&self) -> &ClientHandle {
        &self.handle
    }

    /// Push a payload to the transport, waiting at most the write timeout for
    /// buffer space. Errors report the caller's location.
    #[track_caller]
    pub fn send_message(
        &self,
        payload: Arc<str>,
    ) -> impl Future<Output = HubErrorResult<()>> + Send + '_ {
        let location = ErrorLocation::from(Location::caller());

        async move {
            match self.sink.send_timeout(payload, self.write_timeout).await {
                Ok(()) => Ok(()),
                Err(SendTimeoutError::Timeout(_)) => Err(HubError::SlowClient {
                    timeout_ms: u64::try_from(self.write_timeout.as_millis())
                        .unwrap_or(u64::MAX),
                    location,
                }),
                Err(SendTimeoutError::Closed(_)) => Err(HubError::ConnectionClosed {
                    reason: "transport dropped the stream".to_string(),
                    location,
                }),
            }
        }
    }

    /// Queue a payload without waiting.
    ///
    /// Used for last-message replay while the hub lock is held; a freshly
    /// created connection always has room for it.
    #[track_caller]
    pub(crate) fn try_send_message(&self, payload: Arc<str>) -> HubErrorResult<()> {
        let location = ErrorLocation::from(Location::caller());

        self.sink.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => HubError::SlowClient {
                timeout_ms: 0,
                location,
            },
            TrySendError::Closed(_) => HubError::ConnectionClosed {
                reason: "transport dropped the stream".to_string(),
                location,
            },
        })
    }

    pub(crate) fn activate(&self) -> bool {
        self.handle.lifecycle.activate()
    }
}

impl ClientHandle {
    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    pub fn state(&self) -> ClientState {
        self.lifecycle.get()
    }

    pub(crate) fn begin_close(&self) -> bool {
        self.lifecycle.begin_close()
    }

    pub(crate) fn finish_close(&self) {
        self.lifecycle.finish_close()
    }
}
