use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::RosterEntryDto,
        evolution::{
            CutArtistRequest, EvolutionPromptRequest, EvolutionPromptResponse, PoolPickRequest,
            RedraftRequest,
        },
        pool::{PoolEntryDto, PoolResponse},
    },
    error::AppError,
    routes::requester::Requester,
    services::{evolution_service, pool_service},
    state::SharedState,
};

/// Roster evolution and artist pool routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/seasons/{season_id}/evolution/prompt", post(set_prompt))
        .route("/seasons/{season_id}/evolution/cuts", post(cut_artist))
        .route("/seasons/{season_id}/evolution/pool-picks", post(pool_pick))
        .route("/seasons/{season_id}/evolution/redrafts", post(redraft))
        .route("/seasons/{season_id}/pool", get(list_pool))
}

/// Set the week's roster-evolution prompt. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/evolution/prompt",
    tag = "evolution",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = EvolutionPromptRequest,
    responses(
        (status = 200, description = "Prompt stored", body = EvolutionPromptResponse),
        (status = 409, description = "Not in roster evolution")
    )
)]
pub async fn set_prompt(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<EvolutionPromptRequest>>,
) -> Result<Json<EvolutionPromptResponse>, AppError> {
    Ok(Json(
        evolution_service::set_prompt(&state, requester, season_id, payload).await?,
    ))
}

/// Cut an artist into the pool. Players cut their own artists, or an
/// opponent's by spending an advantage.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/evolution/cuts",
    tag = "evolution",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = CutArtistRequest,
    responses(
        (status = 201, description = "Artist moved to the pool", body = PoolEntryDto),
        (status = 403, description = "Caller may not cut this artist"),
        (status = 409, description = "Artist already cut or not in roster evolution")
    )
)]
pub async fn cut_artist(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<CutArtistRequest>>,
) -> Result<(StatusCode, Json<PoolEntryDto>), AppError> {
    let entry = evolution_service::cut_artist(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Sign an artist from the pool onto the caller's roster.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/evolution/pool-picks",
    tag = "evolution",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = PoolPickRequest,
    responses(
        (status = 201, description = "Artist signed", body = RosterEntryDto),
        (status = 409, description = "Pool entry no longer available")
    )
)]
pub async fn pool_pick(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<PoolPickRequest>>,
) -> Result<(StatusCode, Json<RosterEntryDto>), AppError> {
    let entry = evolution_service::pool_pick(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Sign a brand new artist onto the caller's roster.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/evolution/redrafts",
    tag = "evolution",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = RedraftRequest,
    responses(
        (status = 201, description = "Artist signed", body = RosterEntryDto),
        (status = 409, description = "Artist already on a roster or in the pool")
    )
)]
pub async fn redraft(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<RedraftRequest>>,
) -> Result<(StatusCode, Json<RosterEntryDto>), AppError> {
    let entry = evolution_service::redraft(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Artist pool with availability flags.
#[utoipa::path(
    get,
    path = "/seasons/{season_id}/pool",
    tag = "evolution",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses((status = 200, description = "Pool", body = PoolResponse))
)]
pub async fn list_pool(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<PoolResponse>, AppError> {
    Ok(Json(
        pool_service::list_pool(&state, requester, season_id).await?,
    ))
}
