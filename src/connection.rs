//! WebSocket connection management and request/reply correlation

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::{Error, Result};

pub(crate) type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
pub(crate) type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// One registered reply matcher. Matching is exact text equality.
struct PendingReply {
    id: u64,
    reply: String,
    tx: oneshot::Sender<()>,
}

/// Removes a matcher when a correlated exchange leaves scope, whatever
/// the exit path was. A matched entry is already gone by then and the
/// retain is a no-op.
struct MatcherGuard {
    id: u64,
    conn: Arc<WsConnection>,
}

impl Drop for MatcherGuard {
    fn drop(&mut self) {
        self.conn.pending.lock().retain(|p| p.id != self.id);
    }
}

/// WebSocket connection wrapper for the strip controller
///
/// Owns the outbound half of the socket; the inbound half is handed to
/// the session's read loop, which feeds [`WsConnection::resolve_pending`]
/// so correlated exchanges can complete.
pub(crate) struct WsConnection {
    sink: tokio::sync::Mutex<WsSink>,
    pending: Mutex<Vec<PendingReply>>,
    next_reply_id: AtomicU64,
    connected: AtomicBool,
}

impl WsConnection {
    /// Open a control connection to `ws://<host>:<port>`.
    pub(crate) async fn open(host: &str, port: u16) -> Result<(Arc<Self>, WsSource)> {
        let url = format!("ws://{host}:{port}");
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::Transport(format!("failed to connect to {url}: {e}")))?;
        let (sink, source) = stream.split();

        let conn = Arc::new(Self {
            sink: tokio::sync::Mutex::new(sink),
            pending: Mutex::new(Vec::new()),
            next_reply_id: AtomicU64::new(0),
            connected: AtomicBool::new(true),
        });
        log::debug!("control connection established to {url}");
        Ok((conn, source))
    }

    /// Send one text frame.
    pub(crate) async fn send_text(&self, text: &str) -> Result<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(Error::Transport(
                "control connection is closed".to_string(),
            ));
        }
        let mut sink = self.sink.lock().await;
        sink.send(Message::Text(text.to_string()))
            .await
            .map_err(|e| Error::Transport(format!("failed to send {text:?}: {e}")))
    }

    /// Send `text` and wait until a frame exactly equal to
    /// `expected_reply` arrives, or `deadline` elapses.
    ///
    /// Exactly one outcome fires per call and the matcher is always
    /// deregistered on the way out. Concurrent calls with distinct reply
    /// texts are independent; concurrent calls expecting the same text
    /// all complete on the first matching frame, which is accepted
    /// behavior rather than something this layer disambiguates.
    pub(crate) async fn request(
        self: &Arc<Self>,
        text: &str,
        expected_reply: &str,
        deadline: Duration,
    ) -> Result<()> {
        let (rx, _guard) = self.register_matcher(expected_reply);
        self.send_text(text).await?;
        match tokio::time::timeout(deadline, rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(Error::Transport(
                "control connection closed while awaiting reply".to_string(),
            )),
            Err(_) => Err(Error::Timeout(format!(
                "no {expected_reply:?} reply within {deadline:?}"
            ))),
        }
    }

    fn register_matcher(self: &Arc<Self>, reply: &str) -> (oneshot::Receiver<()>, MatcherGuard) {
        let (tx, rx) = oneshot::channel();
        let id = self.next_reply_id.fetch_add(1, Ordering::Relaxed);
        self.pending.lock().push(PendingReply {
            id,
            reply: reply.to_string(),
            tx,
        });
        (
            rx,
            MatcherGuard {
                id,
                conn: Arc::clone(self),
            },
        )
    }

    /// Complete every matcher registered for this exact frame text.
    /// Called from the read loop for each inbound frame.
    pub(crate) fn resolve_pending(&self, frame: &str) {
        let mut pending = self.pending.lock();
        let mut i = 0;
        while i < pending.len() {
            if pending[i].reply == frame {
                let entry = pending.remove(i);
                let _ = entry.tx.send(());
            } else {
                i += 1;
            }
        }
    }

    /// Mark the connection closed and fail every waiter.
    pub(crate) fn mark_closed(&self) {
        self.connected.store(false, Ordering::SeqCst);
        // Dropping the senders wakes the waiting exchanges with an error.
        self.pending.lock().clear();
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
