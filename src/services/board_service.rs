use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::ChallengeBoardEntity,
    dto::{
        board::{AddCategoryRequest, AddChallengeRequest, BoardResponse, ReorderChallengesRequest},
        library::LibraryResponse,
    },
    error::ServiceError,
    services::{access, sse_events::broadcast_season_updated},
    state::{SharedState, library::ChallengeLibrary, rules::RuleResult},
};

/// Read-only canonical challenge library.
pub fn library(state: &SharedState) -> LibraryResponse {
    LibraryResponse::from(state.config().library())
}

/// Board of a season, created empty on first view.
pub async fn get_board(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<BoardResponse, ServiceError> {
    let season = state.load_season(season_id).await?;
    let league = access::load_league(state, season.league_id).await?;
    access::require_member(&league, requester)?;

    if let Some(board) = &season.board {
        return Ok(BoardResponse::build(board, state.config().library()));
    }

    let (board, _season) = state
        .run_season_operation(season_id, |season| {
            Ok(season
                .board
                .get_or_insert_with(ChallengeBoardEntity::empty)
                .clone())
        })
        .await?;
    info!(season_id = %season_id, board_id = %board.id, "challenge board created");
    Ok(BoardResponse::build(&board, state.config().library()))
}

/// Apply a commissioner edit to the board as one unit of work.
async fn edit_board<F>(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    change: &str,
    edit: F,
) -> Result<BoardResponse, ServiceError>
where
    F: FnOnce(&mut ChallengeBoardEntity, &ChallengeLibrary) -> RuleResult<()> + Send,
{
    let league = access::league_of_season(state, season_id).await?;
    access::require_commissioner(&league, requester)?;

    let library = state.config().library();
    let (board, season) = state
        .run_season_operation(season_id, |season| {
            let board = season
                .board
                .get_or_insert_with(ChallengeBoardEntity::empty);
            edit(board, library)?;
            Ok(board.clone())
        })
        .await?;

    info!(
        season_id = %season_id,
        change,
        challenges = board.challenge_count(),
        locked = board.is_locked,
        "challenge board updated"
    );
    broadcast_season_updated(state, season_id, season.version, change);
    Ok(BoardResponse::build(&board, library))
}

/// Add a category named after a canonical category.
pub async fn add_category(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    request: AddCategoryRequest,
) -> Result<BoardResponse, ServiceError> {
    edit_board(state, requester, season_id, "board.category_added", |board, library| {
        board.add_category(library, &request.name).map(|_| ())
    })
    .await
}

/// Delete a category and its challenges.
pub async fn delete_category(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    category_id: Uuid,
) -> Result<BoardResponse, ServiceError> {
    edit_board(state, requester, season_id, "board.category_deleted", |board, _| {
        board.delete_category(category_id)
    })
    .await
}

/// Append a canonical challenge to a category.
pub async fn add_challenge(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    category_id: Uuid,
    request: AddChallengeRequest,
) -> Result<BoardResponse, ServiceError> {
    edit_board(state, requester, season_id, "board.challenge_added", |board, library| {
        board
            .add_challenge(library, category_id, request.canonical_challenge_id.trim())
            .map(|_| ())
    })
    .await
}

/// Remove a challenge from the board.
pub async fn remove_challenge(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    challenge_id: Uuid,
) -> Result<BoardResponse, ServiceError> {
    edit_board(state, requester, season_id, "board.challenge_removed", |board, _| {
        board.remove_challenge(challenge_id)
    })
    .await
}

/// Reorder the challenges of a category.
pub async fn reorder_challenges(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
    category_id: Uuid,
    request: ReorderChallengesRequest,
) -> Result<BoardResponse, ServiceError> {
    edit_board(state, requester, season_id, "board.reordered", |board, _| {
        board.reorder(category_id, &request.challenge_ids)
    })
    .await
}

/// Lock the board. Locking a locked board succeeds.
pub async fn lock_board(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<BoardResponse, ServiceError> {
    edit_board(state, requester, season_id, "board.locked", |board, _| board.lock()).await
}

/// Unlock the board. Always legal.
pub async fn unlock_board(
    state: &SharedState,
    requester: Uuid,
    season_id: Uuid,
) -> Result<BoardResponse, ServiceError> {
    edit_board(state, requester, season_id, "board.unlocked", |board, _| {
        board.unlock();
        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{checkpoint_service, test_support::TestLeague},
        state::{
            checkpoint,
            state_machine::{SeasonEvent, SeasonPhase},
        },
    };

    #[tokio::test]
    async fn first_view_creates_an_empty_board_once() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;

        let first = get_board(&ctx.state, ctx.players[0], season_id).await.unwrap();
        let second = get_board(&ctx.state, ctx.spectator, season_id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert!(first.categories.is_empty());
        assert!(!first.is_locked);
    }

    #[tokio::test]
    async fn lock_needs_fifteen_challenges_and_freezes_edits() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;

        let err = lock_board(&ctx.state, ctx.commissioner, season_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        ctx.fill_board(season_id).await;
        let board = get_board(&ctx.state, ctx.commissioner, season_id).await.unwrap();
        let column = &board.categories[0];
        let removed = &column.challenges[0];
        let board = remove_challenge(&ctx.state, ctx.commissioner, season_id, removed.id)
            .await
            .unwrap();
        assert_eq!(board.challenge_count, 14);
        let err = lock_board(&ctx.state, ctx.commissioner, season_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        add_challenge(
            &ctx.state,
            ctx.commissioner,
            season_id,
            column.id,
            AddChallengeRequest {
                canonical_challenge_id: removed.canonical_challenge_id.clone(),
            },
        )
        .await
        .unwrap();
        let board = lock_board(&ctx.state, ctx.commissioner, season_id)
            .await
            .unwrap();
        assert!(board.is_locked);
        assert!(lock_board(&ctx.state, ctx.commissioner, season_id).await.is_ok());

        let err = delete_category(&ctx.state, ctx.commissioner, season_id, column.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        let board = unlock_board(&ctx.state, ctx.commissioner, season_id)
            .await
            .unwrap();
        assert!(!board.is_locked);
    }

    #[tokio::test]
    async fn the_same_canonical_challenge_cannot_be_placed_twice() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        let board = add_category(
            &ctx.state,
            ctx.commissioner,
            season_id,
            AddCategoryRequest {
                name: "Moods".into(),
            },
        )
        .await
        .unwrap();
        let moods = board.categories[0].id;
        let request = || AddChallengeRequest {
            canonical_challenge_id: "moods-2".into(),
        };

        add_challenge(&ctx.state, ctx.commissioner, season_id, moods, request())
            .await
            .unwrap();
        let err = add_challenge(&ctx.state, ctx.commissioner, season_id, moods, request())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateEntity(_)));
    }

    #[tokio::test]
    async fn reorder_renumbers_densely_and_players_cannot_edit() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        let board = add_category(
            &ctx.state,
            ctx.commissioner,
            season_id,
            AddCategoryRequest {
                name: "Genres".into(),
            },
        )
        .await
        .unwrap();
        let genres = board.categories[0].id;
        for id in ["genres-1", "genres-2", "genres-3"] {
            add_challenge(
                &ctx.state,
                ctx.commissioner,
                season_id,
                genres,
                AddChallengeRequest {
                    canonical_challenge_id: id.into(),
                },
            )
            .await
            .unwrap();
        }

        let board = get_board(&ctx.state, ctx.commissioner, season_id).await.unwrap();
        let mut ids: Vec<Uuid> = board.categories[0].challenges.iter().map(|c| c.id).collect();
        ids.rotate_left(1);

        let err = reorder_challenges(
            &ctx.state,
            ctx.players[0],
            season_id,
            genres,
            ReorderChallengesRequest {
                challenge_ids: ids.clone(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let board = reorder_challenges(
            &ctx.state,
            ctx.commissioner,
            season_id,
            genres,
            ReorderChallengesRequest {
                challenge_ids: ids.clone(),
            },
        )
        .await
        .unwrap();
        let challenges = &board.categories[0].challenges;
        let reordered: Vec<Uuid> = challenges.iter().map(|c| c.id).collect();
        let orders: Vec<u32> = challenges.iter().map(|c| c.order).collect();
        assert_eq!(reordered, ids);
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn a_stale_reorder_is_a_conflict() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        ctx.fill_board(season_id).await;
        let board = get_board(&ctx.state, ctx.commissioner, season_id).await.unwrap();
        let column = &board.categories[0];
        let mut stale: Vec<Uuid> = column.challenges.iter().map(|c| c.id).collect();
        stale.reverse();

        remove_challenge(&ctx.state, ctx.commissioner, season_id, stale[0])
            .await
            .unwrap();
        let before = ctx.state.load_season(season_id).await.unwrap();

        let err = reorder_challenges(
            &ctx.state,
            ctx.commissioner,
            season_id,
            column.id,
            ReorderChallengesRequest {
                challenge_ids: stale,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(after.version, before.version);
    }

    #[tokio::test]
    async fn played_challenges_stay_on_an_unlocked_board() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_in_week_one(2, 3, None).await;
        ctx.play_week(season_id).await;
        ctx.fire(season_id, SeasonEvent::StartRosterEvolution).await;
        ctx.fire(season_id, SeasonEvent::FinishRosterEvolution).await;
        ctx.fire(season_id, SeasonEvent::StartNextWeek).await;

        unlock_board(&ctx.state, ctx.commissioner, season_id)
            .await
            .unwrap();
        let season = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(season.current_week, 2);
        let played = season
            .board
            .as_ref()
            .unwrap()
            .challenges
            .iter()
            .find(|challenge| challenge.selected_week == Some(1))
            .unwrap()
            .clone();

        let err = remove_challenge(&ctx.state, ctx.commissioner, season_id, played.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
        let err = delete_category(&ctx.state, ctx.commissioner, season_id, played.category_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        let response =
            checkpoint_service::apply_checkpoint(&ctx.state, ctx.commissioner, season_id, "WEEK_2")
                .await
                .unwrap();
        assert_eq!(response.to.week, 2);
        let response =
            checkpoint_service::apply_checkpoint(&ctx.state, ctx.commissioner, season_id, "WEEK_1")
                .await
                .unwrap();
        assert_eq!(response.to.phase, SeasonPhase::InSeasonChallengeSelection);

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert!(checkpoint::verify_integrity(&after).is_ok());
        assert!(
            after
                .board
                .as_ref()
                .unwrap()
                .challenges
                .iter()
                .any(|challenge| challenge.id == played.id && challenge.selected_week.is_none())
        );
    }

    #[tokio::test]
    async fn concurrent_locks_both_commit() {
        let ctx = TestLeague::new().await;
        let season_id = ctx.season_with_players(2, 3).await;
        ctx.fill_board(season_id).await;
        let before = ctx.state.load_season(season_id).await.unwrap();

        let lock = || {
            let state = ctx.state.clone();
            let commissioner = ctx.commissioner;
            tokio::spawn(async move { lock_board(&state, commissioner, season_id).await })
        };
        let (first, second) = tokio::join!(lock(), lock());
        assert!(first.unwrap().unwrap().is_locked);
        assert!(second.unwrap().unwrap().is_locked);

        let after = ctx.state.load_season(season_id).await.unwrap();
        assert_eq!(after.version, before.version + 2);
        assert!(after.board.as_ref().unwrap().is_locked);
        assert_eq!(ctx.state.open_gates(), 0);
    }
}
