//! Connection Registry
//!
//! Tracks connected peers and fans text out to all of them. Each peer is
//! represented by the sending half of its outbound queue; the socket writer
//! task owns the receiving half.

use std::collections::HashMap;
use std::net::SocketAddr;

use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::names;

/// Messages a peer may have queued before it counts as unreachable
pub const OUTBOX_CAPACITY: usize = 64;

/// Unique peer identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeerId(Uuid);

impl PeerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A connected chat participant
#[derive(Clone, Debug)]
pub struct Peer {
    pub id: PeerId,

    /// Assigned at connect time, never changes
    pub name: String,

    pub remote_addr: SocketAddr,

    outbox: mpsc::Sender<String>,
}

impl Peer {
    /// Queue `text` for this peer; fails once its writer is gone or its
    /// queue is full
    fn send(&self, text: &str) -> Result<(), mpsc::error::TrySendError<String>> {
        self.outbox.try_send(text.to_string())
    }
}

/// Set of currently connected peers
///
/// Register, unregister and broadcast all take the write lock, so a
/// broadcast always sees a complete membership snapshot.
#[derive(Default)]
pub struct PeerRegistry {
    peers: RwLock<HashMap<PeerId, Peer>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer with a fresh display name
    pub async fn register(
        &self,
        remote_addr: SocketAddr,
        outbox: mpsc::Sender<String>,
    ) -> Peer {
        let peer = Peer {
            id: PeerId::new(),
            name: names::random_full_name(),
            remote_addr,
            outbox,
        };

        self.peers.write().await.insert(peer.id, peer.clone());
        tracing::info!("{} connects as {}", remote_addr, peer.name);
        peer
    }

    /// Remove a peer; absent peers are ignored
    pub async fn unregister(&self, id: PeerId) -> Option<Peer> {
        let removed = self.peers.write().await.remove(&id);
        match &removed {
            Some(peer) => tracing::info!("{} disconnects", peer.remote_addr),
            None => tracing::debug!("Peer {} already unregistered", id),
        }
        removed
    }

    /// Send `text` to every peer, returning how many received it
    ///
    /// A peer whose queue is closed or full is dropped from the registry; delivery to
    /// the others continues.
    pub async fn broadcast(&self, text: &str) -> usize {
        let mut peers = self.peers.write().await;

        let failed: Vec<PeerId> = peers
            .values()
            .filter_map(|peer| match peer.send(text) {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!("Send to {} ({}) failed: {}", peer.name, peer.remote_addr, e);
                    Some(peer.id)
                }
            })
            .collect();

        for id in &failed {
            if let Some(peer) = peers.remove(id) {
                tracing::info!("{} disconnects", peer.remote_addr);
            }
        }

        peers.len()
    }

    pub async fn len(&self) -> usize {
        self.peers.read().await.len()
    }

    #[cfg(test)]
    pub async fn contains(&self, id: PeerId) -> bool {
        self.peers.read().await.contains_key(&id)
    }
}
