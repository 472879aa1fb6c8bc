use std::panic::Location;
use std::path::PathBuf;
use std::result::Result as StdResult;

use error_location::ErrorLocation;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum ConfigError {
    #[error("{category} error: {message} {location}")]
    Generic {
        category: &'static str,
        message: String,
        location: ErrorLocation,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[track_caller]
    fn generic(category: &'static str, message: String) -> Self {
        ConfigError::Generic {
            category,
            message,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Create a config error
    #[track_caller]
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::generic("Config", message.into())
    }

    /// Create a cache settings error
    #[track_caller]
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::generic("Cache", message.into())
    }

    /// Create a broker settings error
    #[track_caller]
    pub fn broker<S: Into<String>>(message: S) -> Self {
        Self::generic("Broker", message.into())
    }

    /// Create a server settings error
    #[track_caller]
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::generic("Server", message.into())
    }

    /// Create a streaming settings error
    #[track_caller]
    pub fn streaming<S: Into<String>>(message: S) -> Self {
        Self::generic("Streaming", message.into())
    }

    /// Create a logging settings error
    #[track_caller]
    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::generic("Logging", message.into())
    }
}

pub type ConfigErrorResult<T> = StdResult<T, ConfigError>;
