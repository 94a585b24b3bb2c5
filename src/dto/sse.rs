use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::state_machine::{SeasonPhase, SeasonState, SeasonStatus};

#[derive(Clone, Debug)]
/// Dispatched payload carried across SSE channels.
pub struct ServerEvent {
    pub event: Option<String>,
    pub data: String,
}

impl ServerEvent {
    /// Build an event from an already rendered data field.
    pub fn new(event: Option<String>, data: String) -> Self {
        Self { event, data }
    }

    /// Convenience wrapper that serialises `payload` into the SSE data field.
    pub fn json<E, T>(event: E, payload: &T) -> serde_json::Result<Self>
    where
        E: Into<Option<String>>,
        T: Serialize,
    {
        Ok(Self {
            event: event.into(),
            data: serde_json::to_string(payload)?,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Initial metadata sent to an SSE client when it connects.
pub struct Handshake {
    /// Season whose stream was joined.
    pub season_id: Uuid,
    /// Human-readable message confirming the subscription.
    pub message: String,
    /// Whether the backend is running without a storage backend connection.
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when the backend enters or leaves degraded mode.
pub struct SystemStatus {
    pub degraded: bool,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast whenever a season moves to another phase or week.
pub struct PhaseChangedEvent {
    pub season_id: Uuid,
    pub phase: SeasonPhase,
    pub week: u32,
    pub status: SeasonStatus,
}

impl PhaseChangedEvent {
    /// Build the payload for a season's new state.
    pub fn new(season_id: Uuid, state: SeasonState) -> Self {
        Self {
            season_id,
            phase: state.position.phase,
            week: state.position.week,
            status: state.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast after any committed change that does not move the phase.
pub struct SeasonUpdatedEvent {
    pub season_id: Uuid,
    /// Version of the season document after the change.
    pub version: u64,
    /// Short machine-readable name of the change, e.g. `draft.pick`.
    pub change: String,
}

#[derive(Debug, Serialize, ToSchema)]
/// Broadcast when a season was rewound to a checkpoint.
pub struct RollbackAppliedEvent {
    pub season_id: Uuid,
    pub checkpoint: String,
    pub phase: SeasonPhase,
    pub week: u32,
}
