use tracing::info;
use uuid::Uuid;

use crate::{
    dto::{
        common::AdvantageDto,
        draft::{
            DraftOrderRequest, DraftPickDto, DraftPickRequest, DraftResponse,
            SelectAdvantageRequest,
        },
    },
    error::ServiceError,
    services::{access, sse_events::broadcast_season_updated},
    state::{SharedState, draft, roster, season},
};

/// Draft order, picks and the player on the clock.
pub async fn get_draft(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<DraftResponse, ServiceError> {
    let season = state.load_season(season_id).await?;
    let league = access::load_league(state, season.league_id).await?;
    access::require_member(&league, requester)?;
    Ok(DraftResponse::from(&season))
}

/// Replace the draft order with a full list of season player ids. Commissioner only.
pub async fn set_order(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: DraftOrderRequest,
) -> Result<DraftResponse, ServiceError> {
    let league = access::league_of_season(state, season_id).await?;
    access::require_commissioner(&league, requester)?;

    let ((), season) = state
        .run_season_operation(season_id, |season| {
            Ok(draft::reorder_players(season, &request.player_ids)?)
        })
        .await?;

    info!(season_id = %season_id, players = request.player_ids.len(), "draft order updated");
    broadcast_season_updated(state, season_id, season.version, "draft.order");
    Ok(DraftResponse::from(&season))
}

/// Pick an artist for the requester, who must be on the clock.
pub async fn make_pick(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: DraftPickRequest,
) -> Result<DraftPickDto, ServiceError> {
    let (pick, season) = state
        .run_season_operation(season_id, |season| {
            let player_id = access::require_season_player(season, requester)?;
            Ok(roster::make_draft_pick(season, player_id, request.artist.into())?)
        })
        .await?;

    info!(
        season_id = %season_id,
        season_player_id = %pick.season_player_id,
        overall_pick = pick.overall_pick,
        artist = %pick.artist.name,
        "draft pick made"
    );
    broadcast_season_updated(state, season_id, season.version, "draft.pick");
    Ok(DraftPickDto::from(&pick))
}

/// Pick the requester's starting advantage from the configured catalogue.
pub async fn select_starting_advantage(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: SelectAdvantageRequest,
) -> Result<AdvantageDto, ServiceError> {
    let catalogue = state.config().starting_advantages().to_vec();
    let (advantage, season) = state
        .run_season_operation(season_id, |season| {
            let player_id = access::require_season_player(season, requester)?;
            Ok(season::select_starting_advantage(
                season,
                player_id,
                &request.kind,
                &catalogue,
            )?)
        })
        .await?;

    info!(season_id = %season_id, season_player_id = %advantage.season_player_id, kind = %advantage.kind, "starting advantage selected");
    broadcast_season_updated(state, season_id, season.version, "advantage.selected");
    Ok(AdvantageDto::from(&advantage))
}

/// Spend one of the requester's advantages.
pub async fn use_advantage(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    advantage_id: Uuid,
) -> Result<AdvantageDto, ServiceError> {
    let (advantage, season) = state
        .run_season_operation(season_id, |season| {
            let player_id = access::require_season_player(season, requester)?;
            Ok(season::use_advantage(season, player_id, advantage_id)?)
        })
        .await?;

    info!(season_id = %season_id, advantage_id = %advantage_id, kind = %advantage.kind, "advantage used");
    broadcast_season_updated(state, season_id, season.version, "advantage.used");
    Ok(AdvantageDto::from(&advantage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dto::common::ArtistDto,
        services::test_support::TestLeague,
        state::state_machine::{SeasonEvent, SeasonPhase},
    };

    fn artist(id: &str) -> DraftPickRequest {
        DraftPickRequest {
            artist: ArtistDto {
                id: id.into(),
                name: id.to_uppercase(),
            },
        }
    }

    #[tokio::test]
    async fn picks_follow_the_snake_and_reject_out_of_turn_players() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        ctx.fire(season_id, SeasonEvent::StartDraft).await;

        let draft = get_draft(&ctx.state, ctx.spectator, season_id).await.unwrap();
        let first = draft.next.unwrap().season_player_id;
        let first_user = ctx.user_of(season_id, first).await;
        let other_user = *ctx.players.iter().find(|user| **user != first_user).unwrap();

        let err = make_pick(&ctx.state, other_user, season_id, artist("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let pick = make_pick(&ctx.state, first_user, season_id, artist("a"))
            .await
            .unwrap();
        assert_eq!(pick.overall_pick, 1);
        assert_eq!(pick.round, 1);

        ctx.run_draft(season_id).await;
        let draft = get_draft(&ctx.state, ctx.commissioner, season_id).await.unwrap();
        assert!(draft.next.is_none());
        assert_eq!(draft.picks.len(), 6);
        // The first player of round one closes round two.
        assert_eq!(draft.picks[5].season_player_id, first);
    }

    #[tokio::test]
    async fn order_changes_only_during_setup() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        let season = ctx.state.load_season(season_id).await.unwrap();
        let mut ids: Vec<Uuid> = season.players.iter().map(|player| player.id).collect();
        ids.reverse();

        let draft = set_order(
            &ctx.state,
            ctx.commissioner,
            season_id,
            DraftOrderRequest {
                player_ids: ids.clone(),
            },
        )
        .await
        .unwrap();
        let order: Vec<Uuid> = draft.order.iter().map(|slot| slot.season_player_id).collect();
        assert_eq!(order, ids);

        ctx.fire(season_id, SeasonEvent::StartDraft).await;
        let err = set_order(
            &ctx.state,
            ctx.commissioner,
            season_id,
            DraftOrderRequest { player_ids: ids },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn starting_advantages_come_from_the_catalogue() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(1, 3).await;
        ctx.fire(season_id, SeasonEvent::StartDraft).await;
        ctx.run_draft(season_id).await;
        ctx.fire(season_id, SeasonEvent::CompleteDraft).await;

        let season = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(season.current_phase, SeasonPhase::AdvantageSelection);

        let err = select_starting_advantage(
            &ctx.state,
            ctx.players[0],
            season_id,
            SelectAdvantageRequest {
                kind: "Time Travel".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let advantage = select_starting_advantage(
            &ctx.state,
            ctx.players[0],
            season_id,
            SelectAdvantageRequest {
                kind: "steal".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(advantage.kind, "Steal");

        let err = use_advantage(&ctx.state, ctx.players[0], season_id, advantage.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }
}
