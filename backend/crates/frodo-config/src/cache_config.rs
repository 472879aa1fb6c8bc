use crate::{ConfigError, ConfigErrorResult, DEFAULT_CACHE_TTL_SECS, DEFAULT_CACHE_URL};

use serde::Deserialize;

const CACHE_URL_SCHEMES: [&str; 3] = ["redis://", "rediss://", "redis+unix://"];

/// Persistent last-message store
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub url: String,
    /// Expiry applied to every stored message (0 = never expire)
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_CACHE_URL),
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !CACHE_URL_SCHEMES
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ConfigError::cache(format!(
                "cache.url must start with one of {}, got '{}'",
                CACHE_URL_SCHEMES.join(", "),
                self.url
            )));
        }

        Ok(())
    }
}
