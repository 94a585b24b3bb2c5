use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::sse::{
        PhaseChangedEvent, RollbackAppliedEvent, SeasonUpdatedEvent, ServerEvent, SystemStatus,
    },
    state::{SharedState, state_machine::SeasonState},
};

const EVENT_PHASE_CHANGED: &str = "phase_changed";
const EVENT_SEASON_UPDATED: &str = "season.updated";
const EVENT_ROLLBACK_APPLIED: &str = "season.rollback";
const EVENT_SYSTEM_STATUS: &str = "system_status";

/// Broadcast a phase/week change of a season.
pub fn broadcast_phase_changed(state: &SharedState, season_id: Uuid, next: SeasonState) {
    let payload = PhaseChangedEvent::new(season_id, next);
    send_season_event(state, season_id, EVENT_PHASE_CHANGED, &payload);
}

/// Broadcast that a season document changed without moving its phase.
pub fn broadcast_season_updated(state: &SharedState, season_id: Uuid, version: u64, change: &str) {
    let payload = SeasonUpdatedEvent {
        season_id,
        version,
        change: change.to_owned(),
    };
    send_season_event(state, season_id, EVENT_SEASON_UPDATED, &payload);
}

/// Broadcast that a season was rewound to a checkpoint.
pub fn broadcast_rollback_applied(
    state: &SharedState,
    season_id: Uuid,
    checkpoint: &str,
    next: SeasonState,
) {
    let payload = RollbackAppliedEvent {
        season_id,
        checkpoint: checkpoint.to_owned(),
        phase: next.position.phase,
        week: next.position.week,
    };
    send_season_event(state, season_id, EVENT_ROLLBACK_APPLIED, &payload);
}

/// Tell every connected season stream whether storage is reachable.
pub fn broadcast_system_status(state: &SharedState, degraded: bool) {
    let payload = SystemStatus { degraded };
    match ServerEvent::json(Some(EVENT_SYSTEM_STATUS.to_string()), &payload) {
        Ok(event) => {
            for hub in state.season_hubs() {
                hub.broadcast(event.clone());
            }
        }
        Err(err) => warn!(error = %err, "failed to serialize system status SSE payload"),
    }
}

/// Publish onto a season's hub. Seasons nobody listens to are skipped.
fn send_season_event(state: &SharedState, season_id: Uuid, event: &str, payload: &impl Serialize) {
    let Some(hub) = state.existing_season_sse(season_id) else {
        return;
    };
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(
            event,
            season_id = %season_id,
            error = %err,
            "failed to serialize season SSE payload"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        state::{AppState, state_machine::SeasonPosition, state_machine::SeasonStatus},
    };

    #[tokio::test]
    async fn phase_change_reaches_season_subscribers() {
        let state = AppState::new(AppConfig::default());
        let season_id = Uuid::new_v4();
        let mut receiver = state.season_sse(season_id).subscribe();

        let next = SeasonState {
            position: SeasonPosition::new(0, crate::state::state_machine::SeasonPhase::Drafting),
            status: SeasonStatus::Preseason,
        };
        broadcast_phase_changed(&state, season_id, next);

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.event.as_deref(), Some(EVENT_PHASE_CHANGED));
        assert!(event.data.contains("\"DRAFTING\""));
    }

    #[tokio::test]
    async fn events_for_unwatched_seasons_create_no_hub() {
        let state = AppState::new(AppConfig::default());
        let season_id = Uuid::new_v4();
        broadcast_season_updated(&state, season_id, 3, "draft.pick");
        assert!(state.existing_season_sse(season_id).is_none());
    }
}
