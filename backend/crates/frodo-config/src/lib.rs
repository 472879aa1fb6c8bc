mod broker_config;
mod cache_config;
mod config;
mod error;
mod log_level;
mod logging_config;
mod server_config;
mod streaming_config;

pub use broker_config::BrokerConfig;
pub use cache_config::CacheConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use server_config::ServerConfig;
pub use streaming_config::StreamingConfig;

const CONFIG_DIR_ENV: &str = "FRODO_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = ".frodo";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_CACHE_URL: &str = "redis://127.0.0.1:6379/0";
const DEFAULT_CACHE_TTL_SECS: u64 = 60;
const DEFAULT_BROKER_URL: &str = "amqp://127.0.0.1:5672/%2f";
const DEFAULT_BROKER_QUEUE: &str = "frodo";
const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

#[cfg(test)]
mod tests;
