use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::MemberRole,
    dto::season::{
        CreateSeasonRequest, JoinSeasonRequest, JoinSeasonResponse, SeasonListItem,
        SeasonResponse, TransitionResponse,
    },
    error::ServiceError,
    services::{access, sse_events::broadcast_season_updated},
    state::{
        SharedState,
        season::{self, SeasonSettings},
        state_machine::SeasonEvent,
        transitions::run_transition_with_broadcast,
    },
};

/// Open a new season in a league. Commissioner only.
pub async fn create_season(
    state: &SharedState,
    requester: Uuid,
    league_id: Uuid,
    request: CreateSeasonRequest,
) -> Result<SeasonResponse, ServiceError> {
    let league = access::load_league(state, league_id).await?;
    access::require_commissioner(&league, requester)?;

    let chaos_week = request.chaos_week.or_else(|| {
        state
            .config()
            .default_chaos_week()
            .filter(|week| *week < request.challenge_count)
    });
    let season = season::new_season(
        league_id,
        SeasonSettings {
            name: request.name,
            roster_size: request.roster_size,
            challenge_count: request.challenge_count,
            chaos_week,
        },
    )?;

    let store = state.require_store().await?;
    store.insert_season(season.clone()).await?;
    info!(
        league_id = %league_id,
        season_id = %season.id,
        challenge_count = season.challenge_count,
        chaos_week = ?chaos_week,
        "season created"
    );
    Ok(SeasonResponse::from(&season))
}

/// Seasons of a league, visible to its members.
pub async fn list_seasons(
    state: &SharedState,
    requester: Uuid,
    league_id: Uuid,
) -> Result<Vec<SeasonListItem>, ServiceError> {
    let league = access::load_league(state, league_id).await?;
    access::require_member(&league, requester)?;

    let store = state.require_store().await?;
    let seasons = store.list_seasons(league_id).await?;
    Ok(seasons.into_iter().map(Into::into).collect())
}

/// Full season view, visible to league members.
pub async fn get_season(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<SeasonResponse, ServiceError> {
    let season = state.load_season(season_id).await?;
    let league = access::load_league(state, season.league_id).await?;
    access::require_member(&league, requester)?;
    Ok(SeasonResponse::from(&season))
}

/// Join a season in setup with a record label.
pub async fn join_season(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: JoinSeasonRequest,
) -> Result<JoinSeasonResponse, ServiceError> {
    let league = access::league_of_season(state, season_id).await?;
    if access::require_member(&league, requester)? == MemberRole::Spectator {
        return Err(ServiceError::Unauthorized(
            "spectators cannot join a season".into(),
        ));
    }

    let (player, season) = state
        .run_season_operation(season_id, |season| {
            Ok(season::join(season, requester, &request.label_name)?)
        })
        .await?;

    info!(season_id = %season_id, season_player_id = %player.id, label = %player.label_name, "player joined season");
    broadcast_season_updated(state, season_id, season.version, "season.player_joined");
    Ok(JoinSeasonResponse {
        season_player_id: player.id,
        label_name: player.label_name,
    })
}

/// Fire one of the dedicated phase transitions. Commissioner only.
pub async fn transition(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    event: SeasonEvent,
) -> Result<TransitionResponse, ServiceError> {
    let league = access::league_of_season(state, season_id).await?;
    access::require_commissioner(&league, requester)?;
    if matches!(event, SeasonEvent::Rollback(_)) {
        return Err(ServiceError::InvalidTransition(
            "rollbacks go through checkpoints".into(),
        ));
    }

    let weekly_advantage = state.config().weekly_advantage().to_owned();
    let ((), next, season) =
        run_transition_with_broadcast(state, season_id, event, |season, plan| {
            season::apply_transition_effects(season, event, plan.to.position, &weekly_advantage)?;
            Ok(())
        })
        .await?;

    info!(
        season_id = %season_id,
        event = ?event,
        phase = %next.position.phase,
        week = next.position.week,
        status = ?next.status,
        "season transition applied"
    );
    Ok(TransitionResponse::new(&season, next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::test_support::TestLeague,
        state::state_machine::{SeasonPhase, SeasonStatus},
    };

    #[tokio::test]
    async fn commissioner_creates_and_players_join() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;

        let season = get_season(&ctx.state, ctx.players[0], season_id)
            .await
            .unwrap();
        assert_eq!(season.players.len(), ctx.players.len());
        assert_eq!(season.phase, SeasonPhase::SeasonSetup);
        assert_eq!(season.chaos_weeks, Vec::<u32>::new());

        let listed = list_seasons(&ctx.state, ctx.commissioner, ctx.league_id)
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn default_chaos_week_applies_when_it_fits() {
        let ctx = TestLeague::new().await;
        let season = create_season(
            &ctx.state,
            ctx.commissioner,
            ctx.league_id,
            CreateSeasonRequest {
                name: "Summer".into(),
                roster_size: 2,
                challenge_count: 8,
                chaos_week: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(season.chaos_weeks, vec![5]);
    }

    #[tokio::test]
    async fn players_cannot_create_seasons_or_fire_transitions() {
        let ctx = TestLeague::new().await;
        let err = create_season(
            &ctx.state,
            ctx.players[0],
            ctx.league_id,
            CreateSeasonRequest {
                name: "Rogue".into(),
                roster_size: 2,
                challenge_count: 3,
                chaos_week: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let season_id = ctx.season_with_players(2, 3).await;
        let err = transition(&ctx.state, ctx.players[0], season_id, SeasonEvent::StartDraft)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn failed_transition_leaves_the_stored_season_untouched() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        let before = ctx.state.load_season(season_id).await.unwrap();

        let err = transition(&ctx.state, ctx.commissioner, season_id, SeasonEvent::CompleteDraft)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        let response = transition(&ctx.state, ctx.commissioner, season_id, SeasonEvent::StartDraft)
            .await
            .unwrap();
        assert_eq!(response.phase, SeasonPhase::Drafting);

        let err = transition(&ctx.state, ctx.commissioner, season_id, SeasonEvent::CompleteDraft)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(after.version, before.version + 1);
        assert_eq!(after.current_phase, SeasonPhase::Drafting);
        assert_eq!(after.status, SeasonStatus::Preseason);
    }

    #[tokio::test]
    async fn spectators_cannot_join() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        let err = join_season(
            &ctx.state,
            ctx.spectator,
            season_id,
            JoinSeasonRequest {
                label_name: "Bleachers".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}
