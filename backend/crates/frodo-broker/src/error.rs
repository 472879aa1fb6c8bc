use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("AMQP error: {source} {location}")]
    Amqp {
        source: lapin::Error,
        location: ErrorLocation,
    },

    #[error("Undecodable delivery: {message} {location}")]
    Decode {
        message: String,
        location: ErrorLocation,
    },
}

impl BrokerError {
    #[track_caller]
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<lapin::Error> for BrokerError {
    #[track_caller]
    fn from(source: lapin::Error) -> Self {
        Self::Amqp {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BrokerError>;
