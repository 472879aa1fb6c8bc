use crate::{
    BrokerConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, CacheConfig, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, LoggingConfig, ServerConfig, StreamingConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub broker: BrokerConfig,
    pub server: ServerConfig,
    pub streaming: StreamingConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from file and environment.
    ///
    /// Loading order:
    /// 1. Check for FRODO_CONFIG_DIR env var, else use ./.frodo/
    /// 2. Load config.toml if it exists, else use defaults
    /// 3. Apply FRODO_* environment variable overrides
    ///
    /// Command-line flags are applied by the server on top of the result.
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_path = Self::config_dir()?.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: FRODO_CONFIG_DIR env var > ./.frodo/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call once the final values are known to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.cache.validate()?;
        self.broker.validate()?;
        self.server.validate()?;
        self.streaming.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Log configuration summary; connection URLs are reduced to scheme and host.
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}", self.server.bind);
        info!(
            "  cache: {} (ttl: {}s)",
            redact_url(&self.cache.url),
            self.cache.ttl_secs
        );
        info!(
            "  broker: {} (exchange: {})",
            redact_url(&self.broker.url),
            self.broker.queue
        );
        info!(
            "  streaming: buffer={}, write_timeout={}ms, keep_alive={}s",
            self.streaming.client_buffer_size,
            self.streaming.write_timeout_ms,
            self.streaming.keep_alive_secs
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stdout")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Cache
        Self::apply_env_string("FRODO_CACHE", &mut self.cache.url);
        Self::apply_env_parse("FRODO_TTL", &mut self.cache.ttl_secs);

        // Broker
        Self::apply_env_string("FRODO_BROKER", &mut self.broker.url);
        Self::apply_env_string("FRODO_QUEUE", &mut self.broker.queue);

        // Server
        Self::apply_env_string("FRODO_BIND", &mut self.server.bind);

        // Streaming
        Self::apply_env_parse(
            "FRODO_WRITE_TIMEOUT_MS",
            &mut self.streaming.write_timeout_ms,
        );
        Self::apply_env_parse(
            "FRODO_CLIENT_BUFFER_SIZE",
            &mut self.streaming.client_buffer_size,
        );
        Self::apply_env_parse(
            "FRODO_KEEP_ALIVE_SECS",
            &mut self.streaming.keep_alive_secs,
        );

        // Logging
        Self::apply_env_parse("FRODO_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("FRODO_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("FRODO_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for non-empty String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name)
            && !val.is_empty()
        {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values; unparseable values are ignored
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}

/// `scheme://host:port` of a URL, without credentials or path
pub(crate) fn redact_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return String::from("<invalid url>");
    };
    let authority = rest.split('/').next().unwrap_or_default();
    let host = authority.rsplit('@').next().unwrap_or_default();
    format!("{scheme}://{host}")
}
