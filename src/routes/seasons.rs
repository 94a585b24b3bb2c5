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
        phase::PhaseEventDto,
        season::{JoinSeasonRequest, JoinSeasonResponse, SeasonResponse, TransitionResponse},
    },
    error::AppError,
    routes::requester::Requester,
    services::season_service,
    state::SharedState,
};

/// Season view, membership and phase transitions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/seasons/{season_id}", get(get_season))
        .route("/seasons/{season_id}/players", post(join_season))
        .route("/seasons/{season_id}/phase/{event}", post(transition))
}

/// Full season document as seen by league members.
#[utoipa::path(
    get,
    path = "/seasons/{season_id}",
    tag = "seasons",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses(
        (status = 200, description = "Season", body = SeasonResponse),
        (status = 404, description = "Unknown season")
    )
)]
pub async fn get_season(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<SeasonResponse>, AppError> {
    Ok(Json(
        season_service::get_season(&state, requester, season_id).await?,
    ))
}

/// Join the season with a label name. League players only, during setup.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/players",
    tag = "seasons",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = JoinSeasonRequest,
    responses(
        (status = 201, description = "Joined", body = JoinSeasonResponse),
        (status = 403, description = "Caller is not a league player"),
        (status = 409, description = "Already joined or season started")
    )
)]
pub async fn join_season(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<JoinSeasonRequest>>,
) -> Result<(StatusCode, Json<JoinSeasonResponse>), AppError> {
    let joined = season_service::join_season(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(joined)))
}

/// Fire a phase transition. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/phase/{event}",
    tag = "phases",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier"),
        ("event" = PhaseEventDto, Path, description = "Transition to fire, e.g. `start-draft`")
    ),
    responses(
        (status = 200, description = "New phase", body = TransitionResponse),
        (status = 403, description = "Caller is not the commissioner"),
        (status = 409, description = "Transition not allowed from the current phase")
    )
)]
pub async fn transition(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path((season_id, event)): Path<(Uuid, PhaseEventDto)>,
) -> Result<Json<TransitionResponse>, AppError> {
    Ok(Json(
        season_service::transition(&state, requester, season_id, event.into()).await?,
    ))
}
