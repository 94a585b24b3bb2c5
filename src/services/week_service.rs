use tracing::info;
use uuid::Uuid;

use crate::{
    dto::week::{
        ChallengeSelectionDto, PresenterResponse, SelectChallengeRequest, SubmissionDto,
        SubmitPlaylistRequest, VoteDto, VoteRequest, WeekResponse,
    },
    error::ServiceError,
    services::{access, sse_events::broadcast_season_updated},
    state::{SharedState, season},
};

/// Progress of the season's current week.
pub async fn current_week(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<WeekResponse, ServiceError> {
    let season = state.load_season(season_id).await?;
    let league = access::load_league(state, season.league_id).await?;
    access::require_member(&league, requester)?;
    Ok(WeekResponse::build(&season, state.config().library()))
}

/// Pick the week's challenge. Open to the week's selector; the commissioner
/// may pick on the selector's behalf.
pub async fn select_challenge(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: SelectChallengeRequest,
) -> Result<ChallengeSelectionDto, ServiceError> {
    let league = access::league_of_season(state, season_id).await?;
    let is_commissioner = league.commissioner_id == requester;

    let (selection, season) = state
        .run_season_operation(season_id, |season| {
            let selector = season::weekly_selector(season, season.current_week)
                .map(|player| (player.id, player.user_id))
                .ok_or_else(|| ServiceError::InvalidTransition("no weekly selector".into()))?;
            if selector.1 != requester && !is_commissioner {
                return Err(ServiceError::Unauthorized(
                    "another label picks this week's challenge".into(),
                ));
            }
            Ok(season::select_weekly_challenge(
                season,
                selector.0,
                request.board_challenge_id,
            )?)
        })
        .await?;

    info!(
        season_id = %season_id,
        week = selection.week,
        board_challenge_id = %selection.board_challenge_id,
        "weekly challenge selected"
    );
    broadcast_season_updated(state, season_id, season.version, "week.challenge_selected");
    Ok(ChallengeSelectionDto::build(
        &season,
        state.config().library(),
        &selection,
    ))
}

/// Submit or replace the requester's playlist.
pub async fn submit_playlist(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: SubmitPlaylistRequest,
) -> Result<SubmissionDto, ServiceError> {
    let (submission, season) = state
        .run_season_operation(season_id, |season| {
            let player_id = access::require_season_player(season, requester)?;
            Ok(season::submit_playlist(season, player_id, request.tracks)?)
        })
        .await?;

    info!(season_id = %season_id, week = submission.week, tracks = submission.tracks.len(), "playlist submitted");
    broadcast_season_updated(state, season_id, season.version, "week.playlist_submitted");
    Ok(SubmissionDto::from(&submission))
}

/// Move the presentation to the next playlist. Commissioner only.
pub async fn next_presenter(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<PresenterResponse, ServiceError> {
    let league = access::league_of_season(state, season_id).await?;
    access::require_commissioner(&league, requester)?;

    let (presenter, season) = state
        .run_season_operation(season_id, |season| Ok(season::advance_presentation(season)?))
        .await?;

    let week = season.current_week;
    let presented = season
        .presentations
        .iter()
        .find(|presentation| presentation.week == week)
        .map_or(0, |presentation| presentation.presented.len());
    broadcast_season_updated(state, season_id, season.version, "week.presentation");
    Ok(PresenterResponse {
        season_player_id: presenter,
        presented,
        remaining: season.players.len().saturating_sub(presented),
    })
}

/// Cast or replace the requester's ballot.
pub async fn cast_vote(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: VoteRequest,
) -> Result<VoteDto, ServiceError> {
    let (vote, season) = state
        .run_season_operation(season_id, |season| {
            let player_id = access::require_season_player(season, requester)?;
            Ok(season::cast_vote(season, player_id, request.target_player_id)?)
        })
        .await?;

    broadcast_season_updated(state, season_id, season.version, "week.vote_cast");
    Ok(VoteDto::from(&vote))
}
