use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle of a client connection.
///
/// `Connecting -> Active -> Closing -> Closed`. A client may also go straight
/// from `Connecting` to `Closing` if the hub refuses it. `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClientState {
    Connecting = 0,
    Active = 1,
    Closing = 2,
    Closed = 3,
}

impl ClientState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Connecting,
            1 => Self::Active,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Atomic cell shared by every clone of a client connection
#[derive(Debug)]
pub(crate) struct ClientLifecycle(AtomicU8);

impl ClientLifecycle {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(ClientState::Connecting as u8))
    }

    pub(crate) fn get(&self) -> ClientState {
        ClientState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// `Connecting -> Active`; false if the client already left `Connecting`
    pub(crate) fn activate(&self) -> bool {
        self.transition(ClientState::Connecting, ClientState::Active)
    }

    /// Enter `Closing` from `Connecting` or `Active`.
    ///
    /// Returns true for exactly one caller over the lifetime of the client.
    pub(crate) fn begin_close(&self) -> bool {
        let mut current = self.0.load(Ordering::Acquire);

        loop {
            match ClientState::from_u8(current) {
                ClientState::Connecting | ClientState::Active => {
                    match self.0.compare_exchange(
                        current,
                        ClientState::Closing as u8,
                        Ordering::AcqRel,
                        Ordering::Acquire,
                    ) {
                        Ok(_) => return true,
                        Err(actual) => current = actual,
                    }
                }
                ClientState::Closing | ClientState::Closed => return false,
            }
        }
    }

    pub(crate) fn finish_close(&self) {
        self.0.store(ClientState::Closed as u8, Ordering::Release);
    }

    fn transition(&self, from: ClientState, to: ClientState) -> bool {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
