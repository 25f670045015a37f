//! In-process channel
//!
//! A broadcast hub with a bounded history, used when master and followers share
//! a process (tests, local demos).

use super::{Envelope, History, Publish, Snapshot, Subscribe, Subscription, SyncError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

const BROADCAST_CAPACITY: usize = 256;

/// Cloneable handle to a shared in-memory channel
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    name: String,
    sender: broadcast::Sender<Envelope>,
    history: Mutex<History>,
}

impl MemoryChannel {
    #[must_use]
    pub fn new(name: impl Into<String>, retain: usize) -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                sender,
                history: Mutex::new(History::new(retain)),
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Record a message and fan it out to live subscribers
    pub fn send(&self, envelope: Envelope) {
        self.inner
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope.clone());
        // No receivers is fine: the message is still in history for late joiners
        let delivered = self.inner.sender.send(envelope).unwrap_or(0);
        debug!(channel = %self.inner.name, delivered, "message sent");
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.inner
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Publish for MemoryChannel {
    fn publish(&self, snapshot: &Snapshot) {
        match Envelope::state(snapshot) {
            Ok(envelope) => self.send(envelope),
            Err(e) => warn!(channel = %self.inner.name, error = %e, "failed to serialize snapshot"),
        }
    }
}

#[async_trait]
impl Subscribe for MemoryChannel {
    async fn subscribe(&self) -> Result<Subscription, SyncError> {
        let mut live = self.inner.sender.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let name = self.inner.name.clone();

        tokio::spawn(async move {
            loop {
                match live.recv().await {
                    Ok(envelope) => {
                        if tx.send(envelope).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(channel = %name, skipped, "subscriber lagged, messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(Subscription::new(rx))
    }

    async fn history(&self, limit: usize) -> Result<Vec<Envelope>, SyncError> {
        Ok(self
            .inner
            .history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .tail(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::STATE_EVENT;

    fn snapshot(row: usize) -> Snapshot {
        Snapshot {
            current_row: row,
            started: true,
            ..Snapshot::default()
        }
    }

    #[tokio::test]
    async fn subscribers_receive_published_snapshots() {
        let channel = MemoryChannel::new("room", 5);
        let mut sub = channel.subscribe().await.unwrap();

        channel.publish(&snapshot(1));
        channel.publish(&snapshot(2));

        let first = sub.next().await.unwrap();
        assert_eq!(first.name, STATE_EVENT);
        assert_eq!(first.data["currentRow"], 1);
        assert_eq!(sub.next().await.unwrap().data["currentRow"], 2);
    }

    #[tokio::test]
    async fn publish_without_subscribers_lands_in_history() {
        let channel = MemoryChannel::new("room", 5);
        for row in 0..8 {
            channel.publish(&snapshot(row));
        }
        assert_eq!(channel.history_len(), 5);

        let recent = channel.history(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].data["currentRow"], 6);
        assert_eq!(recent[1].data["currentRow"], 7);
    }

    #[tokio::test]
    async fn clones_share_one_channel() {
        let channel = MemoryChannel::new("room", 5);
        let follower_side = channel.clone();
        let mut sub = follower_side.subscribe().await.unwrap();

        channel.publish(&snapshot(3));
        assert_eq!(sub.next().await.unwrap().data["currentRow"], 3);
        assert_eq!(follower_side.name(), "room");
    }
}
