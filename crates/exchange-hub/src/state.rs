//! Application State

use std::sync::Arc;

use crate::hub::Hub;
use crate::registry::PeerRegistry;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Command dispatcher (owns the fetch pipeline)
    pub hub: Arc<Hub>,

    /// Connected peers, shared with the hub
    pub registry: Arc<PeerRegistry>,
}

impl AppState {
    pub fn new(hub: Hub) -> Self {
        let registry = Arc::clone(hub.registry());
        Self {
            hub: Arc::new(hub),
            registry,
        }
    }
}
