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
        league::{AddMemberRequest, CreateLeagueRequest, LeagueResponse},
        season::{CreateSeasonRequest, SeasonListItem, SeasonResponse},
    },
    error::AppError,
    routes::requester::Requester,
    services::{league_service, season_service},
    state::SharedState,
};

/// League management and season creation.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/leagues", post(create_league))
        .route("/leagues/{league_id}", get(get_league))
        .route("/leagues/{league_id}/members", post(add_member))
        .route(
            "/leagues/{league_id}/seasons",
            get(list_seasons).post(create_season),
        )
}

/// Create a league; the caller becomes its commissioner.
#[utoipa::path(
    post,
    path = "/leagues",
    tag = "leagues",
    params(("X-User-Id" = Uuid, Header, description = "Caller's user id")),
    request_body = CreateLeagueRequest,
    responses(
        (status = 201, description = "League created", body = LeagueResponse),
        (status = 400, description = "Invalid payload")
    )
)]
pub async fn create_league(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Valid(Json(payload)): Valid<Json<CreateLeagueRequest>>,
) -> Result<(StatusCode, Json<LeagueResponse>), AppError> {
    let league = league_service::create_league(&state, requester, payload).await?;
    Ok((StatusCode::CREATED, Json(league)))
}

/// League with its members. Members only.
#[utoipa::path(
    get,
    path = "/leagues/{league_id}",
    tag = "leagues",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("league_id" = Uuid, Path, description = "League identifier")
    ),
    responses(
        (status = 200, description = "League", body = LeagueResponse),
        (status = 403, description = "Caller is not a member"),
        (status = 404, description = "Unknown league")
    )
)]
pub async fn get_league(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(league_id): Path<Uuid>,
) -> Result<Json<LeagueResponse>, AppError> {
    Ok(Json(
        league_service::get_league(&state, requester, league_id).await?,
    ))
}

/// Add a player or spectator to the league. Commissioner only.
#[utoipa::path(
    post,
    path = "/leagues/{league_id}/members",
    tag = "leagues",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("league_id" = Uuid, Path, description = "League identifier")
    ),
    request_body = AddMemberRequest,
    responses(
        (status = 200, description = "Updated league", body = LeagueResponse),
        (status = 403, description = "Caller is not the commissioner"),
        (status = 409, description = "User or email already a member")
    )
)]
pub async fn add_member(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(league_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<AddMemberRequest>>,
) -> Result<Json<LeagueResponse>, AppError> {
    Ok(Json(
        league_service::add_member(&state, requester, league_id, payload).await?,
    ))
}

/// Seasons of a league. Members only.
#[utoipa::path(
    get,
    path = "/leagues/{league_id}/seasons",
    tag = "seasons",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("league_id" = Uuid, Path, description = "League identifier")
    ),
    responses((status = 200, description = "Season summaries", body = [SeasonListItem]))
)]
pub async fn list_seasons(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(league_id): Path<Uuid>,
) -> Result<Json<Vec<SeasonListItem>>, AppError> {
    Ok(Json(
        season_service::list_seasons(&state, requester, league_id).await?,
    ))
}

/// Create a season in setup. Commissioner only.
#[utoipa::path(
    post,
    path = "/leagues/{league_id}/seasons",
    tag = "seasons",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("league_id" = Uuid, Path, description = "League identifier")
    ),
    request_body = CreateSeasonRequest,
    responses(
        (status = 201, description = "Season created", body = SeasonResponse),
        (status = 400, description = "Invalid season settings"),
        (status = 403, description = "Caller is not the commissioner")
    )
)]
pub async fn create_season(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(league_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<CreateSeasonRequest>>,
) -> Result<(StatusCode, Json<SeasonResponse>), AppError> {
    let season = season_service::create_season(&state, requester, league_id, payload).await?;
    Ok((StatusCode::CREATED, Json(season)))
}
