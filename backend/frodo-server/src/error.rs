use frodo_broker::BrokerError;
use frodo_config::ConfigError;
use frodo_store::StoreError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Config error: {source} {location}")]
    Config {
        source: ConfigError,
        location: ErrorLocation,
    },

    #[error("Cache unavailable: {source} {location}")]
    Store {
        source: StoreError,
        location: ErrorLocation,
    },

    #[error("Broker unavailable: {source} {location}")]
    Broker {
        source: BrokerError,
        location: ErrorLocation,
    },

    #[error("IO error: {source} {location}")]
    Io {
        source: std::io::Error,
        location: ErrorLocation,
    },

    #[error("Logger error: {message} {location}")]
    Logger {
        message: String,
        location: ErrorLocation,
    },
}

impl ServerError {
    #[track_caller]
    pub fn logger<S: Into<String>>(message: S) -> Self {
        Self::Logger {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<ConfigError> for ServerError {
    #[track_caller]
    fn from(source: ConfigError) -> Self {
        Self::Config {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<StoreError> for ServerError {
    #[track_caller]
    fn from(source: StoreError) -> Self {
        Self::Store {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<BrokerError> for ServerError {
    #[track_caller]
    fn from(source: BrokerError) -> Self {
        Self::Broker {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<std::io::Error> for ServerError {
    #[track_caller]
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
