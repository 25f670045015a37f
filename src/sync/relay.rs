//! WebSocket relay server
//!
//! Stands in for a hosted pub/sub service: clients attach to named channels, every
//! published message is fanned out to the attached peers, and each channel keeps a
//! bounded history that late joiners can read back.
//!
//! Routing lives in [`Hub`], which has no I/O and is the primary unit-test target.
//! [`run`] owns the sockets.

use super::protocol::Frame;
use super::{Envelope, History};
use futures_util::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Identifies one client connection
pub type PeerId = u64;

type Outbox = mpsc::UnboundedSender<Frame>;

#[derive(Debug)]
struct ChannelState {
    history: History,
    peers: HashMap<PeerId, Outbox>,
}

/// Channel table: history and attached peers per channel name
#[derive(Debug)]
pub struct Hub {
    channels: HashMap<String, ChannelState>,
    retain: usize,
}

impl Hub {
    #[must_use]
    pub fn new(retain: usize) -> Self {
        Self {
            channels: HashMap::new(),
            retain,
        }
    }

    fn channel_mut(&mut self, name: &str) -> &mut ChannelState {
        let retain = self.retain;
        self.channels
            .entry(name.to_string())
            .or_insert_with(|| ChannelState {
                history: History::new(retain),
                peers: HashMap::new(),
            })
    }

    pub fn attach(&mut self, peer: PeerId, channel: &str, outbox: Outbox) {
        self.channel_mut(channel).peers.insert(peer, outbox);
        debug!(peer, channel, "peer attached");
    }

    /// Record `message` and deliver it to every attached peer
    ///
    /// Returns how many peers it was handed to. Peers whose outbox has closed are
    /// dropped.
    pub fn publish(&mut self, channel: &str, message: Envelope) -> usize {
        let state = self.channel_mut(channel);
        state.history.push(message.clone());
        state.peers.retain(|_, outbox| {
            outbox
                .send(Frame::Message {
                    channel: channel.to_string(),
                    message: message.clone(),
                })
                .is_ok()
        });
        state.peers.len()
    }

    /// The newest `limit` messages on `channel`, oldest first
    #[must_use]
    pub fn history(&self, channel: &str, limit: usize) -> Vec<Envelope> {
        self.channels
            .get(channel)
            .map(|state| state.history.tail(limit.min(self.retain)))
            .unwrap_or_default()
    }

    /// Forget `peer` on every channel
    pub fn detach(&mut self, peer: PeerId) {
        for state in self.channels.values_mut() {
            state.peers.remove(&peer);
        }
    }

    #[must_use]
    pub fn peer_count(&self, channel: &str) -> usize {
        self.channels.get(channel).map_or(0, |state| state.peers.len())
    }

    /// Apply one frame received from `peer`
    pub fn handle(&mut self, peer: PeerId, outbox: &Outbox, frame: Frame) {
        match frame {
            Frame::Attach { channel } => self.attach(peer, &channel, outbox.clone()),
            Frame::Publish { channel, message } => {
                let delivered = self.publish(&channel, message);
                debug!(peer, channel = %channel, delivered, "message relayed");
            }
            Frame::History { channel, limit } => {
                let items = self.history(&channel, limit);
                debug!(peer, channel = %channel, count = items.len(), "history served");
                if outbox.send(Frame::HistoryResult { channel, items }).is_err() {
                    debug!(peer, "history reply dropped, peer gone");
                }
            }
            other => warn!(peer, action = ?other, "client sent a relay-only frame"),
        }
    }
}

/// Run the relay on `listener` until the task is cancelled
///
/// # Errors
///
/// Returns an error if accepting a TCP connection fails.
pub async fn run(listener: TcpListener, retain: usize) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("relay listening on {local_addr}");

    let hub = Arc::new(Mutex::new(Hub::new(retain)));
    let next_peer = AtomicU64::new(1);

    loop {
        let (stream, addr) = listener.accept().await?;
        let peer = next_peer.fetch_add(1, Ordering::Relaxed);
        info!(peer, "accepted TCP connection from {addr}");
        tokio::spawn(serve_peer(stream, peer, Arc::clone(&hub)));
    }
}

async fn serve_peer(stream: TcpStream, peer: PeerId, hub: Arc<Mutex<Hub>>) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(peer, "WebSocket handshake failed: {e}");
            return;
        }
    };
    let (mut write, mut read) = ws_stream.split();

    let (outbox, mut queue) = mpsc::unbounded_channel::<Frame>();
    let writer = tokio::spawn(async move {
        while let Some(frame) = queue.recv().await {
            let Ok(text) = serde_json::to_string(&frame) else {
                continue;
            };
            if write.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg_result) = read.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match serde_json::from_str::<Frame>(text.as_str()) {
                Ok(frame) => hub
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .handle(peer, &outbox, frame),
                Err(e) => warn!(peer, error = %e, "undecodable frame"),
            },
            Ok(Message::Close(_)) => {
                info!(peer, "client sent close frame");
                break;
            }
            Err(e) => {
                warn!(peer, "WebSocket error: {e}");
                break;
            }
            _ => {}
        }
    }

    hub.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .detach(peer);
    drop(outbox);
    writer.abort();
    info!(peer, "peer disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::STATE_EVENT;
    use serde_json::json;

    fn state(n: u64) -> Envelope {
        Envelope {
            name: STATE_EVENT.into(),
            data: json!({ "n": n }),
        }
    }

    #[test]
    fn publish_fans_out_to_attached_peers_only() {
        let mut hub = Hub::new(10);
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        hub.attach(1, "room", tx_a);
        hub.attach(2, "room", tx_b);
        hub.attach(3, "other", tx_c);

        assert_eq!(hub.publish("room", state(1)), 2);

        for rx in [&mut rx_a, &mut rx_b] {
            match rx.try_recv().unwrap() {
                Frame::Message { channel, message } => {
                    assert_eq!(channel, "room");
                    assert_eq!(message, state(1));
                }
                other => panic!("unexpected frame {other:?}"),
            }
        }
        assert!(rx_c.try_recv().is_err());
    }

    #[test]
    fn history_is_per_channel_and_clamped() {
        let mut hub = Hub::new(3);
        for n in 0..5 {
            hub.publish("room", state(n));
        }
        hub.publish("other", state(99));

        assert_eq!(hub.history("room", 100), vec![state(2), state(3), state(4)]);
        assert_eq!(hub.history("room", 1), vec![state(4)]);
        assert_eq!(hub.history("other", 5), vec![state(99)]);
        assert!(hub.history("empty", 5).is_empty());
    }

    #[test]
    fn history_request_is_answered_on_the_requesting_outbox() {
        let mut hub = Hub::new(5);
        hub.publish("room", state(1));

        let (tx, mut rx) = mpsc::unbounded_channel();
        hub.handle(
            7,
            &tx,
            Frame::History {
                channel: "room".into(),
                limit: 5,
            },
        );

        assert_eq!(
            rx.try_recv().unwrap(),
            Frame::HistoryResult {
                channel: "room".into(),
                items: vec![state(1)],
            }
        );
    }

    #[test]
    fn closed_peers_are_dropped_on_publish() {
        let mut hub = Hub::new(5);
        let (tx, rx) = mpsc::unbounded_channel();
        hub.attach(1, "room", tx);
        drop(rx);

        assert_eq!(hub.publish("room", state(1)), 0);
        assert_eq!(hub.peer_count("room"), 0);
    }

    #[test]
    fn detach_removes_peer_everywhere() {
        let mut hub = Hub::new(5);
        let (tx, _rx) = mpsc::unbounded_channel();
        hub.handle(4, &tx, Frame::Attach { channel: "a".into() });
        hub.handle(4, &tx, Frame::Attach { channel: "b".into() });
        assert_eq!(hub.peer_count("a"), 1);

        hub.detach(4);
        assert_eq!(hub.peer_count("a"), 0);
        assert_eq!(hub.peer_count("b"), 0);
    }

    #[test]
    fn publisher_is_not_required_to_attach() {
        let mut hub = Hub::new(5);
        let (master_tx, mut master_rx) = mpsc::unbounded_channel();
        let (follower_tx, mut follower_rx) = mpsc::unbounded_channel();
        hub.handle(2, &follower_tx, Frame::Attach { channel: "room".into() });

        hub.handle(
            1,
            &master_tx,
            Frame::Publish {
                channel: "room".into(),
                message: state(5),
            },
        );

        assert!(master_rx.try_recv().is_err());
        assert!(matches!(
            follower_rx.try_recv().unwrap(),
            Frame::Message { .. }
        ));
    }
}
