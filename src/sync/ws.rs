//! WebSocket client transport
//!
//! Connects to a relay (see [`super::relay`]) and speaks the [`Frame`] protocol.
//! Outgoing frames go through an unbounded queue drained by a writer task, so
//! publishing never waits on the network. A reader task routes live messages to
//! subscribers and history replies to whoever asked, in request order.

use super::protocol::Frame;
use super::{Envelope, Publish, Snapshot, Subscribe, Subscription, SyncError};
use async_trait::async_trait;
use futures_util::{SinkExt, Stream, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::tungstenite::{self, Message};
use tracing::{debug, info, warn};

/// Client end of a relay channel
#[derive(Debug)]
pub struct WsChannel {
    channel: String,
    outbound: mpsc::UnboundedSender<Frame>,
    routes: Arc<Routes>,
    history_timeout: Duration,
}

/// Where incoming frames go
#[derive(Debug, Default)]
pub struct Routes {
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Envelope>>>,
    pending_history: Mutex<VecDeque<oneshot::Sender<Vec<Envelope>>>>,
    attached: AtomicBool,
}

impl Routes {
    fn add_subscriber(&self, tx: mpsc::UnboundedSender<Envelope>) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
    }

    fn expect_history(&self, tx: oneshot::Sender<Vec<Envelope>>) {
        self.pending_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(tx);
    }

    /// Route one decoded frame from the relay
    pub fn dispatch(&self, frame: Frame) {
        match frame {
            Frame::Message { message, .. } => {
                let mut subscribers = self
                    .subscribers
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                subscribers.retain(|tx| tx.send(message.clone()).is_ok());
            }
            Frame::HistoryResult { items, .. } => {
                let waiter = self
                    .pending_history
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .pop_front();
                match waiter {
                    Some(tx) => {
                        // The requester may have timed out already
                        let _ = tx.send(items);
                    }
                    None => debug!("unsolicited history reply dropped"),
                }
            }
            other => warn!(action = ?other, "unexpected frame from relay"),
        }
    }

    /// Drop every subscriber and waiter so they observe the shutdown
    pub fn close(&self) {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.pending_history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl WsChannel {
    /// Connect to the relay at `url` and bind to `channel`
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::WebSocket`] if the connection or handshake fails.
    pub async fn connect(
        url: &str,
        channel: &str,
        history_timeout: Duration,
    ) -> Result<Self, SyncError> {
        info!(url, channel, "connecting to relay");
        let (stream, _response) = tokio_tungstenite::connect_async(url).await?;
        let (mut write, read) = stream.split();

        let (outbound, mut queue) = mpsc::unbounded_channel::<Frame>();
        tokio::spawn(async move {
            while let Some(frame) = queue.recv().await {
                let text = match serde_json::to_string(&frame) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!(error = %e, "failed to encode frame");
                        continue;
                    }
                };
                if let Err(e) = write.send(Message::Text(text.into())).await {
                    warn!(error = %e, "relay write failed, dropping outbound queue");
                    break;
                }
            }
        });

        let routes = Arc::new(Routes::default());
        let reader_routes = Arc::clone(&routes);
        tokio::spawn(async move {
            process_frames(read, &reader_routes).await;
            reader_routes.close();
            info!("relay connection closed");
        });

        info!(channel, "relay connection established");
        Ok(Self {
            channel: channel.to_string(),
            outbound,
            routes,
            history_timeout,
        })
    }

    /// Connect when a relay is configured
    ///
    /// No URL or a failed connection yields `None` together with a short status
    /// line for the UI; the caller carries on locally.
    pub async fn open(
        url: Option<&str>,
        channel: &str,
        history_timeout: Duration,
    ) -> (Option<Self>, String) {
        let Some(url) = url else {
            info!("no relay configured, running locally");
            return (None, "local only".to_string());
        };
        match Self::connect(url, channel, history_timeout).await {
            Ok(ws) => (Some(ws), format!("{url} #{channel}")),
            Err(e) => {
                warn!(url, error = %e, "relay unreachable, running locally");
                (None, format!("offline ({e})"))
            }
        }
    }

    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    fn send(&self, frame: Frame) -> Result<(), SyncError> {
        self.outbound.send(frame).map_err(|_| SyncError::Closed)
    }
}

impl Publish for WsChannel {
    fn publish(&self, snapshot: &Snapshot) {
        let message = match Envelope::state(snapshot) {
            Ok(message) => message,
            Err(e) => {
                warn!(channel = %self.channel, error = %e, "failed to serialize snapshot");
                return;
            }
        };
        let frame = Frame::Publish {
            channel: self.channel.clone(),
            message,
        };
        if let Err(e) = self.send(frame) {
            warn!(channel = %self.channel, error = %e, "snapshot not published");
        }
    }
}

#[async_trait]
impl Subscribe for WsChannel {
    async fn subscribe(&self) -> Result<Subscription, SyncError> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.routes.add_subscriber(tx);
        if !self.routes.attached.swap(true, Ordering::SeqCst) {
            self.send(Frame::Attach {
                channel: self.channel.clone(),
            })?;
        }
        Ok(Subscription::new(rx))
    }

    async fn history(&self, limit: usize) -> Result<Vec<Envelope>, SyncError> {
        let (tx, rx) = oneshot::channel();
        self.routes.expect_history(tx);
        self.send(Frame::History {
            channel: self.channel.clone(),
            limit,
        })?;

        match tokio::time::timeout(self.history_timeout, rx).await {
            Ok(Ok(items)) => Ok(items),
            Ok(Err(_)) => Err(SyncError::Closed),
            Err(_) => Err(SyncError::Timeout(self.history_timeout)),
        }
    }
}

/// Decode relay frames from any message stream and route them
///
/// Stops on a close frame, a transport error, or the end of the stream. Text
/// frames that are not valid [`Frame`] JSON are skipped.
pub async fn process_frames<St>(mut stream: St, routes: &Routes)
where
    St: Stream<Item = Result<Message, tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match serde_json::from_str::<Frame>(text.as_str()) {
                Ok(frame) => routes.dispatch(frame),
                Err(e) => warn!(error = %e, "undecodable frame from relay"),
            },
            Ok(Message::Close(_)) => {
                info!("relay sent close frame");
                break;
            }
            Err(e) => {
                warn!(error = %e, "relay connection error");
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
}
