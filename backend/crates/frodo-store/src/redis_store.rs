use crate::{Result, StoreError};

use std::future::Future;
use std::panic::Location;

use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::{Config, Connection, Pool, Runtime};
use error_location::ErrorLocation;
use frodo_hub::{HubError, MessageStore, Result as HubResult};
use log::{debug, info};

/// Last-message store on a pooled Redis connection.
///
/// Keys are channel names. Every write carries the configured expiry unless
/// it is 0, in which case keys never expire.
pub struct RedisStore {
    pool: Pool,
    ttl_secs: u64,
}

impl RedisStore {
    /// Build the pool and verify the server answers before returning
    pub async fn connect(url: &str, ttl_secs: u64) -> Result<Self> {
        let pool = Config::from_url(url).create_pool(Some(Runtime::Tokio1))?;
        let store = Self { pool, ttl_secs };

        store.ping().await?;
        info!("Connected to cache (ttl: {ttl_secs}s)");

        Ok(store)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;

        if self.ttl_secs > 0 {
            let _: () = conn.set_ex(key, value, self.ttl_secs).await?;
        } else {
            let _: () = conn.set(key, value).await?;
        }

        debug!("Stored last message for {key}");
        Ok(())
    }

    pub async fn has_key(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    /// Round-trip a `PING`; errors report the caller's location
    #[track_caller]
    pub fn ping(&self) -> impl Future<Output = Result<()>> + Send + '_ {
        let location = ErrorLocation::from(Location::caller());

        async move {
            let mut conn = self.connection().await?;
            let reply: String = redis::cmd("PING").query_async(&mut conn).await?;

            if reply != "PONG" {
                return Err(StoreError::UnexpectedReply { reply, location });
            }
            Ok(())
        }
    }

    /// Connections currently held by the pool, idle or in use
    pub fn connection_count(&self) -> usize {
        self.pool.status().size
    }

    /// Close the pool; later calls fail
    pub fn close(&self) {
        self.pool.close();
        info!("Cache pool closed");
    }

    async fn connection(&self) -> Result<Connection> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl MessageStore for RedisStore {
    async fn load(&self, channel: &str) -> HubResult<Option<String>> {
        self.get(channel)
            .await
            .map_err(|e| HubError::store(e.to_string()))
    }

    async fn save(&self, channel: &str, payload: &str) -> HubResult<()> {
        self.set(channel, payload)
            .await
            .map_err(|e| HubError::store(e.to_string()))
    }
}
