use tracing::info;
use uuid::Uuid;

use crate::{
    dto::checkpoint::{CheckpointDto, CheckpointListResponse, RollbackResponse},
    error::ServiceError,
    services::{
        access,
        sse_events::{broadcast_phase_changed, broadcast_rollback_applied},
    },
    state::{
        SharedState,
        checkpoint::{self, CheckpointId},
    },
};

/// Rewind targets of the season's current state, each flagged with its
/// availability.
pub async fn list_checkpoints(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<CheckpointListResponse, ServiceError> {
    let season = state.load_season(season_id).await?;
    let league = access::load_league(state, season.league_id).await?;
    access::require_member(&league, requester)?;

    let checkpoints = checkpoint::list_checkpoints(
        season.current_phase,
        season.current_week,
        season.status,
    )
    .into_iter()
    .map(CheckpointDto::from)
    .collect();

    Ok(CheckpointListResponse {
        phase: season.current_phase,
        week: season.current_week,
        checkpoints,
    })
}

/// Roll the season back to a checkpoint as a single unit of work. A failed
/// rollback commits nothing.
pub async fn apply_checkpoint(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    checkpoint: &str,
) -> Result<RollbackResponse, ServiceError> {
    let id: CheckpointId = checkpoint
        .parse()
        .map_err(|err: checkpoint::ParseCheckpointError| {
            ServiceError::InvalidInput(err.to_string())
        })?;

    let league = access::league_of_season(state, season_id).await?;
    access::require_commissioner(&league, requester)?;

    let (report, season) = state
        .run_season_operation(season_id, |season| Ok(checkpoint::rollback(season, id)?))
        .await?;

    info!(
        season_id = %season_id,
        checkpoint = %id,
        from = %report.from.position,
        to = %report.to.position,
        votes = report.counts.votes,
        submissions = report.counts.submissions,
        roster_entries = report.counts.roster_entries,
        "checkpoint applied"
    );

    broadcast_rollback_applied(state, season_id, &id.to_string(), report.to);
    broadcast_phase_changed(state, season_id, report.to);
    Ok(RollbackResponse::new(report, season.version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::test_support::TestLeague,
        state::state_machine::{SeasonPhase, SeasonStatus},
    };

    #[tokio::test]
    async fn week_checkpoint_clears_the_week_and_bumps_the_version() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_in_week_one(2, 3, None).await;
        ctx.play_week(season_id).await;
        let before = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(before.current_phase, SeasonPhase::InSeasonWeekEnd);
        assert!(!before.week_results.is_empty());

        let listed = list_checkpoints(&ctx.state, ctx.spectator, season_id)
            .await
            .unwrap();
        assert!(
            listed
                .checkpoints
                .iter()
                .any(|checkpoint| checkpoint.id == "WEEK_1" && checkpoint.is_available)
        );

        let response = apply_checkpoint(&ctx.state, ctx.commissioner, season_id, "WEEK_1")
            .await
            .unwrap();
        assert_eq!(response.to.week, 1);
        assert_eq!(response.to.phase, SeasonPhase::InSeasonChallengeSelection);
        assert_eq!(response.status, SeasonStatus::InProgress);
        assert_eq!(response.version, before.version + 1);
        assert_eq!(response.removed.votes, ctx.players.len());

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert!(after.votes.is_empty());
        assert!(after.submissions.is_empty());
        assert!(after.week_results.is_empty());
        assert!(after.challenge_selections.is_empty());
        assert_eq!(after.draft_picks.len(), before.draft_picks.len());
    }

    #[tokio::test]
    async fn rejected_checkpoints_commit_nothing() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_in_week_one(2, 3, None).await;
        let before = ctx.state.load_season(season_id).await.unwrap();

        let err = apply_checkpoint(&ctx.state, ctx.commissioner, season_id, "WEEK_2")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        let err = apply_checkpoint(&ctx.state, ctx.commissioner, season_id, "YESTERDAY")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let err = apply_checkpoint(&ctx.state, ctx.players[0], season_id, "DRAFT")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(after.version, before.version);
        assert_eq!(after.position(), before.position());
    }

    #[tokio::test]
    async fn draft_checkpoint_returns_every_pick() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_in_week_one(2, 3, None).await;

        let response = apply_checkpoint(&ctx.state, ctx.commissioner, season_id, "DRAFT")
            .await
            .unwrap();
        assert_eq!(response.to.phase, SeasonPhase::Drafting);
        assert_eq!(response.removed.draft_picks, 2 * ctx.players.len());

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert!(after.draft_picks.is_empty());
        assert!(after.roster.is_empty());
        assert_eq!(after.players.len(), ctx.players.len());
    }

    #[tokio::test]
    async fn concurrent_rollbacks_commit_one_at_a_time() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_in_week_one(2, 3, None).await;
        ctx.play_week(season_id).await;
        let before = ctx.state.load_season(season_id).await.unwrap();

        let apply = |target: &'static str| {
            let state = ctx.state.clone();
            let commissioner = ctx.commissioner;
            tokio::spawn(async move {
                apply_checkpoint(&state, commissioner, season_id, target).await
            })
        };
        let (week, draft) = tokio::join!(apply("WEEK_1"), apply("DRAFT"));
        let week = week.unwrap();
        let draft = draft.unwrap();

        // DRAFT is reachable from anywhere past it; WEEK_1 only before the
        // draft rollback lands.
        let draft = draft.unwrap();
        let successes = 1 + u64::from(week.is_ok());
        if let Err(err) = &week {
            assert!(matches!(err, ServiceError::InvalidTransition(_)));
        }

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(after.version, before.version + successes);
        assert!(draft.version <= after.version);
        assert_eq!(after.current_phase, SeasonPhase::Drafting);
        assert!(after.draft_picks.is_empty());
        assert!(after.votes.is_empty());
        assert!(checkpoint::verify_integrity(&after).is_ok());
        assert_eq!(ctx.state.open_gates(), 0);
    }
}
