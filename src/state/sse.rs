use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::dto::sse::ServerEvent;

/// SSE-specific sub-state carved out from [`AppState`](super::AppState): one
/// broadcast hub per season, created when the first client subscribes.
pub struct SseState {
    capacity: usize,
    seasons: DashMap<Uuid, Arc<SseHub>>,
}

impl SseState {
    /// Build the SSE sub-tree with the per-season channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seasons: DashMap::new(),
        }
    }

    /// Hub of a season, creating it if needed.
    pub fn hub(&self, season_id: Uuid) -> Arc<SseHub> {
        self.seasons
            .entry(season_id)
            .or_insert_with(|| Arc::new(SseHub::new(self.capacity)))
            .clone()
    }

    /// Hub of a season if one was created.
    pub fn existing(&self, season_id: Uuid) -> Option<Arc<SseHub>> {
        self.seasons.get(&season_id).map(|hub| hub.clone())
    }

    /// Snapshot of every hub.
    pub fn all(&self) -> Vec<Arc<SseHub>> {
        self.seasons.iter().map(|hub| hub.value().clone()).collect()
    }
}

/// Simple broadcast hub wrapper used by the SSE services.
pub struct SseHub {
    sender: broadcast::Sender<ServerEvent>,
}

impl SseHub {
    /// Construct a new hub backed by a Tokio broadcast channel with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Register a new subscriber that will receive subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    /// Send an event to all current subscribers, ignoring delivery errors.
    pub fn broadcast(&self, event: ServerEvent) {
        let _ = self.sender.send(event);
    }
}
