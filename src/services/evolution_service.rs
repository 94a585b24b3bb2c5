use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        common::RosterEntryDto,
        evolution::{
            CutArtistRequest, EvolutionPromptRequest, EvolutionPromptResponse, PoolPickRequest,
            RedraftRequest,
        },
        pool::PoolEntryDto,
    },
    error::ServiceError,
    services::{access, sse_events::broadcast_season_updated},
    state::{SharedState, roster},
};

/// Set the prompt of the current roster-evolution week. Commissioner only.
pub async fn set_prompt(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: EvolutionPromptRequest,
) -> Result<EvolutionPromptResponse, ServiceError> {
    let league = access::league_of_season(state, season_id).await?;
    access::require_commissioner(&league, requester)?;

    let (prompt, season) = state
        .run_season_operation(season_id, |season| {
            Ok(roster::select_evolution_prompt(season, &request.prompt)?)
        })
        .await?;

    broadcast_season_updated(state, season_id, season.version, "evolution.prompt");
    Ok(EvolutionPromptResponse {
        week: prompt.week,
        prompt: prompt.prompt,
    })
}

/// Cut an artist into the pool. Players cut as themselves; the commissioner
/// may cut any artist when not playing in the season.
pub async fn cut_artist(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: CutArtistRequest,
) -> Result<PoolEntryDto, ServiceError> {
    let league = access::league_of_season(state, season_id).await?;
    let is_commissioner = league.commissioner_id == requester;

    let (entry, season) = state
        .run_season_operation(season_id, |season| {
            let actor = match season.player_for_user(requester) {
                Some(player) => Some(player.id),
                None if is_commissioner => None,
                None => {
                    return Err(ServiceError::Unauthorized(format!(
                        "user `{requester}` does not play in this season"
                    )));
                }
            };
            Ok(roster::cut_artist(season, actor, request.roster_entry_id)?)
        })
        .await?;

    info!(
        season_id = %season_id,
        artist = %entry.artist.name,
        reason = ?entry.entered_via,
        week = entry.entered_pool_week,
        "artist cut into the pool"
    );
    broadcast_season_updated(state, season_id, season.version, "evolution.cut");
    Ok(PoolEntryDto::build(&season, &entry))
}

/// Sign an available pool artist onto the requester's roster.
pub async fn pool_pick(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: PoolPickRequest,
) -> Result<RosterEntryDto, ServiceError> {
    let (entry, season) = state
        .run_season_operation(season_id, |season| {
            let player_id = access::require_season_player(season, requester)?;
            Ok(roster::draft_from_pool(season, player_id, request.pool_entry_id)?)
        })
        .await?;

    info!(season_id = %season_id, artist = %entry.artist.name, "artist drafted from the pool");
    broadcast_season_updated(state, season_id, season.version, "evolution.pool_pick");
    Ok(RosterEntryDto::from(&entry))
}

/// Sign a fresh artist onto the requester's roster.
pub async fn redraft(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: RedraftRequest,
) -> Result<RosterEntryDto, ServiceError> {
    let (entry, season) = state
        .run_season_operation(season_id, |season| {
            let player_id = access::require_season_player(season, requester)?;
            Ok(roster::redraft_artist(season, player_id, request.artist.into())?)
        })
        .await?;

    info!(season_id = %season_id, artist = %entry.artist.name, "artist redrafted");
    broadcast_season_updated(state, season_id, season.version, "evolution.redraft");
    Ok(RosterEntryDto::from(&entry))
}
