//! Follower view
//!
//! A follower never evaluates anything. It keeps the last snapshot it was handed
//! and replaces it wholesale with each new one.

use crate::sync::{Envelope, Snapshot, Subscribe, Subscription, SyncError};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct Follower {
    view: Snapshot,
    applied: u64,
    live_seen: bool,
}

impl Follower {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The read-only copy of the master's state
    #[must_use]
    pub const fn view(&self) -> &Snapshot {
        &self.view
    }

    /// Number of snapshots applied so far
    #[must_use]
    pub const fn applied(&self) -> u64 {
        self.applied
    }

    /// Overwrite the view
    ///
    /// The cursor is clamped to the board since peers are not trusted.
    pub fn apply(&mut self, mut snapshot: Snapshot) {
        snapshot.clamp_cursor();
        self.view = snapshot;
        self.applied += 1;
    }

    /// Apply a live message; returns `true` if it carried a usable snapshot
    pub fn receive(&mut self, envelope: &Envelope) -> bool {
        match decode(envelope) {
            Some(snapshot) => {
                self.apply(snapshot);
                self.live_seen = true;
                true
            }
            None => false,
        }
    }

    /// Apply the newest usable snapshot from a history page (oldest first)
    ///
    /// Ignored once a live message has been applied, so a stale history page can
    /// never roll the view back.
    pub fn catch_up(&mut self, history: &[Envelope]) -> bool {
        if self.live_seen {
            debug!("live state already applied, skipping history");
            return false;
        }
        match history.iter().rev().find_map(decode) {
            Some(snapshot) => {
                info!(row = snapshot.current_row, "caught up from history");
                self.apply(snapshot);
                true
            }
            None => false,
        }
    }
}

fn decode(envelope: &Envelope) -> Option<Snapshot> {
    if !envelope.is_state() {
        debug!(name = %envelope.name, "ignoring non-state message");
        return None;
    }
    match serde_json::from_value(envelope.data.clone()) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            warn!(error = %e, "dropping malformed snapshot");
            None
        }
    }
}

/// Join a channel as a follower
///
/// Subscribes first, then reads back up to `history_limit` messages so that
/// anything published during the history round trip is still queued on the
/// subscription and applied afterwards. A failed history fetch is logged and
/// the follower simply starts from a blank view.
///
/// # Errors
///
/// Returns an error only if the subscription itself cannot be created.
pub async fn join<S>(channel: &S, history_limit: usize) -> Result<(Follower, Subscription), SyncError>
where
    S: Subscribe + ?Sized,
{
    let subscription = channel.subscribe().await?;
    let mut follower = Follower::new();

    match channel.history(history_limit).await {
        Ok(items) => {
            follower.catch_up(&items);
        }
        Err(e) => warn!(error = %e, "history fetch failed, waiting for live state"),
    }

    Ok((follower, subscription))
}
