use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Connection closed: {reason} {location}")]
    ConnectionClosed {
        reason: String,
        location: ErrorLocation,
    },

    #[error("Client too slow, write not accepted within {timeout_ms}ms {location}")]
    SlowClient {
        timeout_ms: u64,
        location: ErrorLocation,
    },

    #[error("Invalid channel name: {name:?} {location}")]
    InvalidChannel {
        name: String,
        location: ErrorLocation,
    },

    #[error("Hub is shutting down {location}")]
    HubClosed { location: ErrorLocation },

    #[error("Store error: {message} {location}")]
    Store {
        message: String,
        location: ErrorLocation,
    },
}

impl HubError {
    /// Create a store error from any displayable failure
    #[track_caller]
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Short label used for metrics and log grouping
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionClosed { .. } => "connection_closed",
            Self::SlowClient { .. } => "slow_client",
            Self::InvalidChannel { .. } => "invalid_channel",
            Self::HubClosed { .. } => "hub_closed",
            Self::Store { .. } => "store",
        }
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
