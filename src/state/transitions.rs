use uuid::Uuid;

use crate::{
    dao::models::SeasonEntity,
    error::ServiceError,
    services::sse_events::broadcast_phase_changed,
    state::{
        Plan, SharedState,
        state_machine::{SeasonEvent, SeasonState},
    },
};

/// Execute a planned season transition, then broadcast the resulting phase change.
pub async fn run_transition_with_broadcast<F, T>(
    state: &SharedState,
    season_id: Uuid,
    event: SeasonEvent,
    work: F,
) -> Result<(T, SeasonState, SeasonEntity), ServiceError>
where
    F: FnOnce(&mut SeasonEntity, &Plan) -> Result<T, ServiceError> + Send,
    T: Send,
{
    let (res, next, season) = state.run_transition(season_id, event, work).await?;
    broadcast_phase_changed(state, season_id, next);
    Ok((res, next, season))
}
