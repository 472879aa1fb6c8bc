use crate::{BrokerError, Result};

use serde::Deserialize;
use serde_json::Value;

/// One upstream message addressed to a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerMessage {
    pub channel: String,
    /// Delivered to subscribers verbatim
    pub payload: String,
}

#[derive(Deserialize)]
struct Envelope {
    channel: String,
    data: Value,
}

impl BrokerMessage {
    /// Decode a delivery body of the form `{"channel": "...", "data": ...}`.
    ///
    /// String data is taken as is; any other JSON value becomes its compact text.
    pub fn decode(body: &[u8]) -> Result<Self> {
        let envelope: Envelope = serde_json::from_slice(body)
            .map_err(|e| BrokerError::decode(format!("invalid envelope: {e}")))?;

        let payload = match envelope.data {
            Value::String(text) => text,
            other => other.to_string(),
        };

        Ok(Self {
            channel: envelope.channel,
            payload,
        })
    }
}
