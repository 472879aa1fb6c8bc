use std::panic::Location;

use deadpool_redis::redis::RedisError;
use deadpool_redis::{CreatePoolError, PoolError};
use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid cache settings: {message} {location}")]
    Config {
        message: String,
        location: ErrorLocation,
    },

    #[error("Cache pool error: {source} {location}")]
    Pool {
        source: PoolError,
        location: ErrorLocation,
    },

    #[error("Redis error: {source} {location}")]
    Redis {
        source: RedisError,
        location: ErrorLocation,
    },

    #[error("Unexpected PING reply: {reply} {location}")]
    UnexpectedReply {
        reply: String,
        location: ErrorLocation,
    },
}

impl From<CreatePoolError> for StoreError {
    #[track_caller]
    fn from(error: CreatePoolError) -> Self {
        Self::Config {
            message: error.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<PoolError> for StoreError {
    #[track_caller]
    fn from(source: PoolError) -> Self {
        Self::Pool {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<RedisError> for StoreError {
    #[track_caller]
    fn from(source: RedisError) -> Self {
        Self::Redis {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
