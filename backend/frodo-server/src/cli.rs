use frodo_config::{Config, LogLevel};

use clap::Parser;

/// Command-line overrides; each flag wins over env vars and config.toml
#[derive(Parser, Debug, Default)]
#[command(name = "frodo")]
#[command(about = "Fan out broker messages to server-sent event subscribers")]
#[command(version)]
pub struct Cli {
    /// Redis URL for the last-message store
    #[arg(long)]
    pub cache: Option<String>,

    /// Seconds before a stored message expires (0 = never)
    #[arg(long)]
    pub ttl: Option<u64>,

    /// AMQP broker URL
    #[arg(long)]
    pub broker: Option<String>,

    /// Fanout exchange to consume from
    #[arg(long)]
    pub queue: Option<String>,

    /// Listen address, host:port or :port
    #[arg(long)]
    pub bind: Option<String>,

    /// off, error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(cache) = &self.cache {
            config.cache.url = cache.clone();
        }
        if let Some(ttl) = self.ttl {
            config.cache.ttl_secs = ttl;
        }
        if let Some(broker) = &self.broker {
            config.broker.url = broker.clone();
        }
        if let Some(queue) = &self.queue {
            config.broker.queue = queue.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
    }
}
