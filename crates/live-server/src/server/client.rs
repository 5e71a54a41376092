//! Reload clients: the sending half of a browser's `/ws` connection.

use crate::error::SendError;
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::SinkExt;
use futures_util::stream::SplitSink;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Text frame sent to a page that should reload.
pub const RELOAD_MESSAGE: &str = "reload";

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a connected client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(u64);

impl ClientId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        Self(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Something a reload notice can be delivered to.
///
/// Clones must refer to the same underlying connection.
#[async_trait]
pub trait ReloadClient: Clone + Send + Sync + 'static {
    fn id(&self) -> ClientId;

    /// Deliver one reload notice.
    async fn send_reload(&self) -> Result<(), SendError>;

    /// Close the connection. Calling it again is a no-op.
    async fn close(&self);
}

/// Reload client backed by an axum WebSocket.
#[derive(Clone)]
pub struct WsClient {
    id: ClientId,
    inner: Arc<WsClientInner>,
}

struct WsClientInner {
    sink: Mutex<SplitSink<WebSocket, Message>>,
    closed: AtomicBool,
}

impl WsClient {
    pub fn new(sink: SplitSink<WebSocket, Message>) -> Self {
        Self {
            id: ClientId::next(),
            inner: Arc::new(WsClientInner {
                sink: Mutex::new(sink),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for WsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WsClient")
            .field("id", &self.id)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl ReloadClient for WsClient {
    fn id(&self) -> ClientId {
        self.id
    }

    async fn send_reload(&self) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Disconnected);
        }

        let mut sink = self.inner.sink.lock().await;
        sink.send(Message::Text(RELOAD_MESSAGE.into()))
            .await
            .map_err(classify_send_error)
    }

    async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let mut sink = self.inner.sink.lock().await;
        // The peer may already be gone; there is nobody left to tell.
        let _ = sink.close().await;
    }
}

/// Split send failures into ordinary disconnects and real transport errors.
pub(crate) fn classify_send_error(err: axum::Error) -> SendError {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
    while let Some(e) = source {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if is_disconnect_kind(io.kind()) {
                return SendError::Disconnected;
            }
        }
        source = e.source();
    }

    let message = err.to_string();
    // tungstenite reports sends after a close handshake this way
    if message.contains("closed connection") || message.contains("Connection closed") {
        return SendError::Disconnected;
    }

    SendError::Transport(message)
}

fn is_disconnect_kind(kind: std::io::ErrorKind) -> bool {
    use std::io::ErrorKind::*;
    matches!(
        kind,
        BrokenPipe | ConnectionReset | ConnectionAborted | NotConnected | UnexpectedEof
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_ids_are_unique() {
        let a = ClientId::next();
        let b = ClientId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn test_client_id_display() {
        assert_eq!(ClientId(7).to_string(), "#7");
    }

    #[test]
    fn test_broken_pipe_is_disconnect() {
        let err = axum::Error::new(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "broken pipe",
        ));
        assert!(classify_send_error(err).is_disconnect());
    }

    #[test]
    fn test_other_errors_are_transport() {
        let err = axum::Error::new(std::io::Error::other("disk on fire"));
        assert!(matches!(
            classify_send_error(err),
            SendError::Transport(msg) if msg.contains("disk on fire")
        ));
    }
}
