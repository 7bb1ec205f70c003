//! HTTP/WebSocket Handlers

use std::fmt::Display;
use std::net::SocketAddr;

use axum::{
    Json,
    extract::{
        ConnectInfo, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::hub::Hub;
use crate::registry::{OUTBOX_CAPACITY, Peer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub peers: usize,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        peers: state.registry.len().await,
    })
}

/// Chat WebSocket endpoint
pub async fn chat_socket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, remote_addr, state))
}

async fn handle_socket(socket: WebSocket, remote_addr: SocketAddr, state: AppState) {
    let (sender, receiver) = socket.split();
    run_session(&state.hub, remote_addr, sender, receiver).await;
}

/// One peer's connection: register, read until close, unregister
async fn run_session<W, R, E>(hub: &Hub, remote_addr: SocketAddr, sink: W, stream: R)
where
    W: Sink<Message> + Unpin + Send + 'static,
    W::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let (outbox, inbox) = mpsc::channel(OUTBOX_CAPACITY);
    let peer = hub.registry().register(remote_addr, outbox).await;

    let writer = tokio::spawn(forward_outbox(inbox, sink, remote_addr));
    read_loop(hub, &peer, stream).await;

    hub.registry().unregister(peer.id).await;
    writer.abort();
}

/// Drain the peer's queue into the socket
///
/// A failed write drops the queue, so the next broadcast removes the peer.
async fn forward_outbox<W>(mut inbox: mpsc::Receiver<String>, mut sink: W, remote_addr: SocketAddr)
where
    W: Sink<Message> + Unpin,
    W::Error: Display,
{
    while let Some(text) = inbox.recv().await {
        if let Err(e) = sink.send(Message::Text(text.into())).await {
            tracing::debug!("Write to {} failed: {}", remote_addr, e);
            break;
        }
    }
}

/// Dispatch text frames until the peer closes or the socket errors
async fn read_loop<R, E>(hub: &Hub, peer: &Peer, mut stream: R)
where
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    while let Some(msg) = stream.next().await {
        match msg {
            Ok(Message::Text(text)) => hub.handle_message(peer, text.as_str()).await,
            Ok(Message::Close(_)) => break,
            Err(e) => {
                tracing::debug!("Read from {} failed: {}", peer.remote_addr, e);
                break;
            }
            _ => continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    use exchange_core::{MockRateSource, RateFetcher, RoutePool};
    use futures::stream;

    use crate::config::ExchangeDefaults;
    use crate::registry::PeerRegistry;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn hub() -> Hub {
        let fetcher = RateFetcher::new(Arc::new(MockRateSource::new()), RoutePool::direct());
        Hub::new(Arc::new(PeerRegistry::new()), fetcher, ExchangeDefaults::default())
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(message);
        }
        out
    }

    #[tokio::test]
    async fn test_close_unregisters_and_binary_is_ignored() {
        let hub = hub();
        let (observer_tx, mut observer_rx) = mpsc::channel(OUTBOX_CAPACITY);
        hub.registry().register(addr(7001), observer_tx).await;

        let (sink, _sink_rx) = futures::channel::mpsc::unbounded::<Message>();
        let frames = stream::iter(vec![
            Ok::<_, io::Error>(Message::Text("hello".into())),
            Ok(Message::Binary(vec![0xde, 0xad].into())),
            Ok(Message::Close(None)),
            Ok(Message::Text("after close".into())),
        ]);

        run_session(&hub, addr(7002), sink, frames).await;

        let received = drain(&mut observer_rx);
        assert_eq!(received.len(), 1);
        assert!(received[0].ends_with(": hello"));
        assert_eq!(hub.registry().len().await, 1);
    }

    #[tokio::test]
    async fn test_read_error_unregisters() {
        let hub = hub();
        let (observer_tx, mut observer_rx) = mpsc::channel(OUTBOX_CAPACITY);
        hub.registry().register(addr(7003), observer_tx).await;

        let (sink, _sink_rx) = futures::channel::mpsc::unbounded::<Message>();
        let frames = stream::iter(vec![
            Ok(Message::Text("one".into())),
            Err(io::Error::other("connection reset")),
            Ok(Message::Text("two".into())),
        ]);

        run_session(&hub, addr(7004), sink, frames).await;

        let received = drain(&mut observer_rx);
        assert_eq!(received.len(), 1);
        assert!(received[0].ends_with(": one"));
        assert_eq!(hub.registry().len().await, 1);
    }

    #[tokio::test]
    async fn test_failed_writer_drops_peer_on_next_broadcast() {
        let registry = PeerRegistry::new();
        let (outbox, inbox) = mpsc::channel(OUTBOX_CAPACITY);
        let peer = registry.register(addr(7005), outbox).await;

        // Socket already gone: every write fails
        let (sink, sink_rx) = futures::channel::mpsc::unbounded::<Message>();
        drop(sink_rx);
        let writer = tokio::spawn(forward_outbox(inbox, sink, addr(7005)));

        assert_eq!(registry.broadcast("first").await, 1);
        writer.await.unwrap();

        assert_eq!(registry.broadcast("second").await, 0);
        assert!(!registry.contains(peer.id).await);
    }

    #[tokio::test]
    async fn test_writer_forwards_text_frames() {
        let (outbox, inbox) = mpsc::channel(OUTBOX_CAPACITY);
        let (sink, sink_rx) = futures::channel::mpsc::unbounded::<Message>();

        outbox.send("rates".to_string()).await.unwrap();
        drop(outbox);
        forward_outbox(inbox, sink, addr(7006)).await;

        let frames: Vec<Message> = sink_rx.collect().await;
        assert_eq!(frames, vec![Message::Text("rates".into())]);
    }
}
