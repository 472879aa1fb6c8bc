use frodo_broker::AmqpBroker;
use frodo_store::RedisStore;

use async_trait::async_trait;
use log::warn;

/// Health view of the last-message store
#[async_trait]
pub trait CacheStatus: Send + Sync {
    async fn ping(&self) -> bool;

    /// Connections held by the store's pool
    fn connection_count(&self) -> usize;
}

/// Health view of the upstream broker
#[async_trait]
pub trait BrokerStatus: Send + Sync {
    async fn ping(&self) -> bool;
}

#[async_trait]
impl CacheStatus for RedisStore {
    async fn ping(&self) -> bool {
        match RedisStore::ping(self).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Cache ping failed: {e}");
                false
            }
        }
    }

    fn connection_count(&self) -> usize {
        RedisStore::connection_count(self)
    }
}

#[async_trait]
impl BrokerStatus for AmqpBroker {
    async fn ping(&self) -> bool {
        AmqpBroker::ping(self)
    }
}
