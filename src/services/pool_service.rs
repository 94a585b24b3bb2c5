use uuid::Uuid;

use crate::{
    dto::pool::PoolResponse, error::ServiceError, services::access, state::SharedState,
};

/// Listed pool entries with availability and, during a chaos week, their
/// OLD/NEW partition.
pub async fn list_pool(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<PoolResponse, ServiceError> {
    let season = state.load_season(season_id).await?;
    let league = access::load_league(state, season.league_id).await?;
    access::require_member(&league, requester)?;
    Ok(PoolResponse::from(&season))
}
