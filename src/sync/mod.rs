//! One-directional state replication
//!
//! The master holds a [`Publish`] capability and pushes a full [`Snapshot`] after
//! every change. Followers hold a [`Subscribe`] capability: a live stream of
//! messages plus a bounded history lookup for catching up after a late join.
//! Transports implement both traits; nothing above this module knows which one is
//! in use.

pub mod memory;
pub mod protocol;
pub mod relay;
mod snapshot;
pub mod ws;

pub use snapshot::{ConfettiCue, Snapshot};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::trace;

/// Message name carrying a state snapshot
pub const STATE_EVENT: &str = "state";

/// Channel used when none is configured
pub const DEFAULT_CHANNEL: &str = "custom-wordle-channel";

/// A named message on a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub name: String,
    pub data: serde_json::Value,
}

impl Envelope {
    /// Wrap a snapshot as a `state` message
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized.
    pub fn state(snapshot: &Snapshot) -> Result<Self, serde_json::Error> {
        Ok(Self {
            name: STATE_EVENT.to_string(),
            data: serde_json::to_value(snapshot)?,
        })
    }

    #[must_use]
    pub fn is_state(&self) -> bool {
        self.name == STATE_EVENT
    }
}

/// Errors raised by transports
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The WebSocket connection failed or broke
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A frame could not be encoded or decoded
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),

    /// The transport shut down before answering
    #[error("channel closed")]
    Closed,

    /// No history reply arrived in time
    #[error("history request timed out after {0:?}")]
    Timeout(Duration),
}

/// Master-side capability: hand a snapshot to the channel
///
/// Fire-and-forget. Implementations never block on delivery and never retry;
/// failures are logged and dropped.
pub trait Publish: Send + Sync {
    fn publish(&self, snapshot: &Snapshot);
}

/// Follower-side capability: live messages and recent history
#[async_trait]
pub trait Subscribe: Send + Sync {
    /// Start receiving live messages
    async fn subscribe(&self) -> Result<Subscription, SyncError>;

    /// Up to `limit` of the most recent messages, oldest first
    async fn history(&self, limit: usize) -> Result<Vec<Envelope>, SyncError>;
}

impl<P: Publish + ?Sized> Publish for Arc<P> {
    fn publish(&self, snapshot: &Snapshot) {
        (**self).publish(snapshot);
    }
}

impl<P: Publish + ?Sized> Publish for Box<P> {
    fn publish(&self, snapshot: &Snapshot) {
        (**self).publish(snapshot);
    }
}

/// Publisher used when no transport is available
///
/// The session keeps working locally; snapshots go nowhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl Publish for Offline {
    fn publish(&self, snapshot: &Snapshot) {
        trace!(row = snapshot.current_row, "offline, snapshot not published");
    }
}

/// Live message stream handed out by [`Subscribe::subscribe`]
#[derive(Debug)]
pub struct Subscription {
    rx: mpsc::UnboundedReceiver<Envelope>,
}

impl Subscription {
    #[must_use]
    pub const fn new(rx: mpsc::UnboundedReceiver<Envelope>) -> Self {
        Self { rx }
    }

    /// Next message, `None` once the transport has shut down
    pub async fn next(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    /// Next message if one is already queued
    pub fn try_next(&mut self) -> Option<Envelope> {
        self.rx.try_recv().ok()
    }
}

/// Bounded message log kept per channel
#[derive(Debug, Clone)]
pub struct History {
    items: VecDeque<Envelope>,
    retain: usize,
}

impl History {
    #[must_use]
    pub fn new(retain: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(retain),
            retain,
        }
    }

    pub fn push(&mut self, envelope: Envelope) {
        if self.retain == 0 {
            return;
        }
        while self.items.len() >= self.retain {
            self.items.pop_front();
        }
        self.items.push_back(envelope);
    }

    /// The newest `limit` entries, oldest first
    #[must_use]
    pub fn tail(&self, limit: usize) -> Vec<Envelope> {
        let skip = self.items.len().saturating_sub(limit);
        self.items.iter().skip(skip).cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(n: u64) -> Envelope {
        Envelope {
            name: STATE_EVENT.into(),
            data: json!({ "n": n }),
        }
    }

    #[test]
    fn history_is_bounded() {
        let mut history = History::new(3);
        for n in 0..5 {
            history.push(envelope(n));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.tail(10), vec![envelope(2), envelope(3), envelope(4)]);
    }

    #[test]
    fn history_tail_is_oldest_first() {
        let mut history = History::new(10);
        for n in 0..4 {
            history.push(envelope(n));
        }
        assert_eq!(history.tail(2), vec![envelope(2), envelope(3)]);
        assert!(history.tail(0).is_empty());
    }

    #[test]
    fn zero_retention_keeps_nothing() {
        let mut history = History::new(0);
        history.push(envelope(1));
        assert!(history.is_empty());
    }

    #[test]
    fn envelope_wraps_snapshot() {
        let envelope = Envelope::state(&Snapshot::default()).unwrap();
        assert!(envelope.is_state());
        assert_eq!(envelope.data["currentRow"], 0);
    }
}
