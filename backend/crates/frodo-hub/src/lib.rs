//! In-process broadcast hub for the frodo fanout gateway.
//!
//! Upstream messages enter through the [`Dispatcher`], which keeps per-channel
//! order and hands each message to [`Hub::publish`]. The hub updates the
//! last-message cache, writes through to the [`MessageStore`], and fans the
//! payload out to a snapshot of the channel's subscribers. Subscribers join
//! with [`Hub::subscribe`] and leave when their [`Subscription`] is dropped.

pub mod channel_name;
pub mod channel_registry;
pub mod client_connection;
pub mod client_id;
pub mod client_state;
pub mod dispatcher;
pub mod error;
pub mod hub;
pub mod hub_config;
pub mod hub_metrics;
pub mod hub_stats;
pub mod last_message_cache;
pub mod message_store;
pub mod publish_report;
pub mod shutdown_coordinator;
pub mod shutdown_guard;
pub mod subscription;

pub use channel_name::ChannelName;
pub use channel_registry::{ChannelRegistry, Removal};
pub use client_connection::{ClientConnection, ClientHandle};
pub use client_id::ClientId;
pub use client_state::ClientState;
pub use dispatcher::Dispatcher;
pub use error::{HubError, Result};
pub use hub::Hub;
pub use hub_config::HubConfig;
pub use hub_metrics::Metrics;
pub use hub_stats::{ChannelStats, HubStats};
pub use last_message_cache::LastMessageCache;
pub use message_store::{MessageStore, NullStore};
pub use publish_report::PublishReport;
pub use shutdown_coordinator::ShutdownCoordinator;
pub use shutdown_guard::ShutdownGuard;
pub use subscription::{Subscription, SubscriptionGuard};

#[cfg(test)]
mod tests;
