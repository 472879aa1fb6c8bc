use crate::{ConfigError, ConfigErrorResult, DEFAULT_LOG_LEVEL, LogLevel};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Colour level names when writing to a terminal
    pub colored: bool,
    /// Append log lines to this file instead of stdout
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(DEFAULT_LOG_LEVEL),
            colored: true,
            file: None,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(file) = &self.file
            && file.trim().is_empty()
        {
            return Err(ConfigError::logging("logging.file must not be empty when set"));
        }

        Ok(())
    }
}
