use crate::{ConfigError, ConfigErrorResult, DEFAULT_BIND};

use std::net::SocketAddr;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address; a bare `:port` binds every interface
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: String::from(DEFAULT_BIND),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.socket_addr().map(|_| ())
    }

    /// Parsed listen address
    pub fn socket_addr(&self) -> ConfigErrorResult<SocketAddr> {
        let normalized = normalize_bind(&self.bind);
        normalized.parse().map_err(|e| {
            ConfigError::server(format!(
                "server.bind must be host:port or :port, got '{}': {e}",
                self.bind
            ))
        })
    }
}

/// Expand the `:port` shorthand to `0.0.0.0:port`
pub(crate) fn normalize_bind(bind: &str) -> String {
    let bind = bind.trim();
    match bind.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => bind.to_string(),
    }
}
