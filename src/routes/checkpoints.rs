use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::checkpoint::{CheckpointListResponse, RollbackResponse},
    error::AppError,
    routes::requester::Requester,
    services::checkpoint_service,
    state::SharedState,
};

/// Checkpoint listing and rollback.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/seasons/{season_id}/checkpoints", get(list_checkpoints))
        .route(
            "/seasons/{season_id}/checkpoints/{checkpoint}",
            post(apply_checkpoint),
        )
}

/// Rewind targets from the season's current state.
#[utoipa::path(
    get,
    path = "/seasons/{season_id}/checkpoints",
    tag = "checkpoints",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses((status = 200, description = "Checkpoints", body = CheckpointListResponse))
)]
pub async fn list_checkpoints(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<CheckpointListResponse>, AppError> {
    Ok(Json(
        checkpoint_service::list_checkpoints(&state, requester, season_id).await?,
    ))
}

/// Roll the season back to a checkpoint. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/checkpoints/{checkpoint}",
    tag = "checkpoints",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier"),
        ("checkpoint" = String, Path, description = "Checkpoint id, e.g. `WEEK_2_PRESENTATION`")
    ),
    responses(
        (status = 200, description = "Rollback applied", body = RollbackResponse),
        (status = 400, description = "Unknown checkpoint id"),
        (status = 409, description = "Checkpoint not available"),
        (status = 500, description = "Rollback failed; nothing was changed")
    )
)]
pub async fn apply_checkpoint(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path((season_id, checkpoint)): Path<(Uuid, String)>,
) -> Result<Json<RollbackResponse>, AppError> {
    Ok(Json(
        checkpoint_service::apply_checkpoint(&state, requester, season_id, &checkpoint).await?,
    ))
}
