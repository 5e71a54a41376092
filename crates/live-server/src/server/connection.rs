//! Per-connection lifecycle for `/ws`.
//!
//! A connection is `Connected` from the moment it is registered until it
//! either takes part in a reload (its own task ran the fan-out, or another
//! task's fan-out removed it) or the peer goes away. Then it is `Closed`
//! and out of the registry for good.

use crate::server::broadcast::{ReloadSignal, fan_out};
use crate::server::client::{ReloadClient, WsClient};
use crate::server::context::SharedContext;
use crate::server::registry::ConnectionRegistry;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connected,
    Closed,
}

/// Why a connection left the `Connected` state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// This task ran a fan-out pass
    Reloaded,
    /// The peer sent a close frame or the stream ended
    PeerClosed,
    /// Reading from the peer failed
    ReadError(String),
}

/// Upgrade handler mounted at `/ws`.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(ctx): State<SharedContext>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, ctx))
}

async fn handle_socket(socket: WebSocket, ctx: SharedContext) {
    let (sink, incoming) = socket.split();
    let client = WsClient::new(sink);

    let connection = Connection::open(client, ctx.registry());
    connection.serve(ctx.signal(), incoming).await;
}

/// A registered client plus the task-side state machine around it.
pub struct Connection<'a, C: ReloadClient> {
    client: C,
    registry: &'a ConnectionRegistry<C>,
    state: ConnectionState,
}

impl<'a, C: ReloadClient> Connection<'a, C> {
    /// Register `client` and enter `Connected`.
    pub fn open(client: C, registry: &'a ConnectionRegistry<C>) -> Self {
        registry.register(client.clone());
        debug!(client = %client.id(), clients = registry.len(), "Client connected");

        Self {
            client,
            registry,
            state: ConnectionState::Connected,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Run until a reload is handled or the peer leaves.
    ///
    /// Whichever happens first wins; the other side is abandoned. Messages
    /// from the peer are read and discarded.
    pub async fn serve<S, E>(mut self, signal: &ReloadSignal, incoming: S) -> CloseReason
    where
        S: Stream<Item = Result<Message, E>> + Unpin,
        E: std::fmt::Display,
    {
        let reason = tokio::select! {
            _ = signal.wait() => {
                let report = fan_out(self.registry).await;
                info!(
                    delivered = report.delivered,
                    disconnected = report.disconnected,
                    failed = report.failed,
                    "Reloaded {} client(s)",
                    report.delivered
                );
                CloseReason::Reloaded
            }
            reason = wait_for_peer_close(incoming) => reason,
        };

        self.close().await;
        debug!(client = %self.client.id(), ?reason, "Client disconnected");
        reason
    }

    /// Leave the registry and close the socket. Idempotent.
    ///
    /// If a fan-out already took the client out of the registry, that pass
    /// owns the close.
    async fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        if let Some(client) = self.registry.remove(self.client.id()) {
            client.close().await;
        }
        self.state = ConnectionState::Closed;
    }
}

async fn wait_for_peer_close<S, E>(mut incoming: S) -> CloseReason
where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: std::fmt::Display,
{
    while let Some(message) = incoming.next().await {
        match message {
            Ok(Message::Close(_)) => return CloseReason::PeerClosed,
            Ok(_) => continue,
            Err(e) => return CloseReason::ReadError(e.to_string()),
        }
    }
    CloseReason::PeerClosed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::testing::MockClient;
    use futures_util::stream;
    use std::convert::Infallible;
    use std::time::Duration;

    #[tokio::test]
    async fn test_peer_close_removes_client() {
        let registry = ConnectionRegistry::new();
        let signal = ReloadSignal::new();
        let client = MockClient::new();

        let connection = Connection::open(client.clone(), &registry);
        assert_eq!(connection.state(), ConnectionState::Connected);
        assert!(registry.contains(client.id()));

        let incoming = stream::iter(vec![
            Ok::<_, Infallible>(Message::Text("hello".into())),
            Ok(Message::Close(None)),
        ]);
        let reason = connection.serve(&signal, incoming).await;

        assert_eq!(reason, CloseReason::PeerClosed);
        assert!(registry.is_empty());
        assert!(client.is_closed());
        assert_eq!(client.sent(), 0);
    }

    #[tokio::test]
    async fn test_read_error_closes() {
        let registry = ConnectionRegistry::new();
        let signal = ReloadSignal::new();
        let client = MockClient::new();

        let connection = Connection::open(client.clone(), &registry);
        let incoming = stream::iter(vec![Err::<Message, _>("reset by peer")]);

        let reason = connection.serve(&signal, incoming).await;
        assert_eq!(reason, CloseReason::ReadError("reset by peer".into()));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_signal_fans_out_to_all_clients() {
        let registry = ConnectionRegistry::new();
        let signal = ReloadSignal::new();
        let waiting = MockClient::new();
        let other = MockClient::new();

        registry.register(other.clone());
        let connection = Connection::open(waiting.clone(), &registry);
        signal.publish();

        let reason = tokio::time::timeout(
            Duration::from_secs(1),
            connection.serve(&signal, stream::pending::<Result<Message, Infallible>>()),
        )
        .await
        .unwrap();

        assert_eq!(reason, CloseReason::Reloaded);
        assert_eq!(waiting.sent(), 1);
        assert_eq!(other.sent(), 1);
        assert!(registry.is_empty());
        // The fan-out already closed it; the task's own close must not repeat.
        assert_eq!(waiting.close_calls(), 1);
    }
}
