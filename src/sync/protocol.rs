//! Relay wire protocol
//!
//! JSON text frames exchanged between clients and the relay, tagged by `action`.
//! Clients send `attach`, `publish` and `history`; the relay answers with
//! `message` and `historyResult`.

use super::Envelope;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Frame {
    /// Start receiving live messages on `channel`
    Attach { channel: String },
    /// Send a message to every peer attached to `channel`
    Publish { channel: String, message: Envelope },
    /// Ask for the newest `limit` messages on `channel`
    History { channel: String, limit: usize },
    /// A live message delivered by the relay
    Message { channel: String, message: Envelope },
    /// Reply to `History`, oldest first
    HistoryResult {
        channel: String,
        items: Vec<Envelope>,
    },
}

impl Frame {
    #[must_use]
    pub fn channel(&self) -> &str {
        match self {
            Self::Attach { channel }
            | Self::Publish { channel, .. }
            | Self::History { channel, .. }
            | Self::Message { channel, .. }
            | Self::HistoryResult { channel, .. } => channel,
        }
    }
}
