use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        common::AdvantageDto,
        draft::{
            DraftOrderRequest, DraftPickDto, DraftPickRequest, DraftResponse,
            SelectAdvantageRequest,
        },
    },
    error::AppError,
    routes::requester::Requester,
    services::draft_service,
    state::SharedState,
};

/// Snake draft and advantage routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/seasons/{season_id}/draft", get(get_draft))
        .route("/seasons/{season_id}/draft/order", put(set_order))
        .route("/seasons/{season_id}/draft/picks", post(make_pick))
        .route("/seasons/{season_id}/advantages", post(select_advantage))
        .route(
            "/seasons/{season_id}/advantages/{advantage_id}/use",
            post(use_advantage),
        )
}

/// Draft order, picks so far and the slot on the clock.
#[utoipa::path(
    get,
    path = "/seasons/{season_id}/draft",
    tag = "draft",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses((status = 200, description = "Draft board", body = DraftResponse))
)]
pub async fn get_draft(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<DraftResponse>, AppError> {
    Ok(Json(
        draft_service::get_draft(&state, requester, season_id).await?,
    ))
}

/// Set the draft order before the first pick. Commissioner only.
#[utoipa::path(
    put,
    path = "/seasons/{season_id}/draft/order",
    tag = "draft",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = DraftOrderRequest,
    responses(
        (status = 200, description = "Draft with the new order", body = DraftResponse),
        (status = 400, description = "Order is not a permutation of the season's players"),
        (status = 409, description = "Picks already made")
    )
)]
pub async fn set_order(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<DraftOrderRequest>>,
) -> Result<Json<DraftResponse>, AppError> {
    Ok(Json(
        draft_service::set_order(&state, requester, season_id, payload).await?,
    ))
}

/// Draft an artist for the player on the clock.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/draft/picks",
    tag = "draft",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = DraftPickRequest,
    responses(
        (status = 201, description = "Pick recorded", body = DraftPickDto),
        (status = 403, description = "Caller is not on the clock"),
        (status = 409, description = "Artist already drafted or draft closed")
    )
)]
pub async fn make_pick(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<DraftPickRequest>>,
) -> Result<(StatusCode, Json<DraftPickDto>), AppError> {
    let pick = draft_service::make_pick(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(pick)))
}

/// Pick the caller's starting advantage.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/advantages",
    tag = "draft",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = SelectAdvantageRequest,
    responses(
        (status = 201, description = "Advantage granted", body = AdvantageDto),
        (status = 400, description = "Unknown advantage kind"),
        (status = 409, description = "Already selected or wrong phase")
    )
)]
pub async fn select_advantage(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SelectAdvantageRequest>>,
) -> Result<(StatusCode, Json<AdvantageDto>), AppError> {
    let advantage =
        draft_service::select_starting_advantage(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(advantage)))
}

/// Spend one of the caller's advantages.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/advantages/{advantage_id}/use",
    tag = "draft",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier"),
        ("advantage_id" = Uuid, Path, description = "Advantage to spend")
    ),
    responses(
        (status = 200, description = "Advantage marked used", body = AdvantageDto),
        (status = 409, description = "Advantage already used")
    )
)]
pub async fn use_advantage(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path((season_id, advantage_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<AdvantageDto>, AppError> {
    Ok(Json(
        draft_service::use_advantage(&state, requester, season_id, advantage_id).await?,
    ))
}
