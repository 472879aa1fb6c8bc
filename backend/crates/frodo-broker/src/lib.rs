//! AMQP consumer that feeds upstream messages into the gateway.

pub mod amqp_broker;
pub mod broker_message;
pub mod error;

pub use amqp_broker::AmqpBroker;
pub use broker_message::BrokerMessage;
pub use error::{BrokerError, Result};
