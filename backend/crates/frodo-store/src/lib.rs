//! Redis-backed persistence for the last message of each channel.

pub mod error;
pub mod redis_store;

pub use error::{Result, StoreError};
pub use redis_store::RedisStore;
