use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::{
        board::{AddCategoryRequest, AddChallengeRequest, BoardResponse, ReorderChallengesRequest},
        library::LibraryResponse,
    },
    error::AppError,
    routes::requester::Requester,
    services::board_service,
    state::SharedState,
};

/// Challenge board editing and the canonical library.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/library", get(library))
        .route("/seasons/{season_id}/board", get(get_board))
        .route("/seasons/{season_id}/board/categories", post(add_category))
        .route(
            "/seasons/{season_id}/board/categories/{category_id}",
            delete(delete_category),
        )
        .route(
            "/seasons/{season_id}/board/categories/{category_id}/challenges",
            post(add_challenge),
        )
        .route(
            "/seasons/{season_id}/board/categories/{category_id}/order",
            put(reorder_challenges),
        )
        .route(
            "/seasons/{season_id}/board/challenges/{challenge_id}",
            delete(remove_challenge),
        )
        .route("/seasons/{season_id}/board/lock", post(lock_board))
        .route("/seasons/{season_id}/board/unlock", post(unlock_board))
}

/// Canonical challenge catalogue.
#[utoipa::path(
    get,
    path = "/library",
    tag = "board",
    responses((status = 200, description = "Canonical challenges by category", body = LibraryResponse))
)]
pub async fn library(State(state): State<SharedState>) -> Json<LibraryResponse> {
    Json(board_service::library(&state))
}

/// Season board grouped by category.
#[utoipa::path(
    get,
    path = "/seasons/{season_id}/board",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses((status = 200, description = "Board", body = BoardResponse))
)]
pub async fn get_board(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::get_board(&state, requester, season_id).await?,
    ))
}

/// Add a category column. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/board/categories",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = AddCategoryRequest,
    responses(
        (status = 200, description = "Updated board", body = BoardResponse),
        (status = 409, description = "Board locked or category already present")
    )
)]
pub async fn add_category(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<AddCategoryRequest>>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::add_category(&state, requester, season_id, payload).await?,
    ))
}

/// Delete a category and its challenges. Commissioner only.
#[utoipa::path(
    delete,
    path = "/seasons/{season_id}/board/categories/{category_id}",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier"),
        ("category_id" = Uuid, Path, description = "Category identifier")
    ),
    responses(
        (status = 200, description = "Updated board", body = BoardResponse),
        (status = 409, description = "Board locked or category holds a played challenge")
    )
)]
pub async fn delete_category(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path((season_id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::delete_category(&state, requester, season_id, category_id).await?,
    ))
}

/// Place a canonical challenge in a category. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/board/categories/{category_id}/challenges",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier"),
        ("category_id" = Uuid, Path, description = "Category identifier")
    ),
    request_body = AddChallengeRequest,
    responses(
        (status = 200, description = "Updated board", body = BoardResponse),
        (status = 409, description = "Board locked or challenge already placed")
    )
)]
pub async fn add_challenge(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path((season_id, category_id)): Path<(Uuid, Uuid)>,
    Valid(Json(payload)): Valid<Json<AddChallengeRequest>>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::add_challenge(&state, requester, season_id, category_id, payload).await?,
    ))
}

/// Replace the order of a category's challenges. Commissioner only.
#[utoipa::path(
    put,
    path = "/seasons/{season_id}/board/categories/{category_id}/order",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier"),
        ("category_id" = Uuid, Path, description = "Category identifier")
    ),
    request_body = ReorderChallengesRequest,
    responses(
        (status = 200, description = "Updated board", body = BoardResponse),
        (status = 400, description = "List contains duplicate ids"),
        (status = 409, description = "List no longer matches the category")
    )
)]
pub async fn reorder_challenges(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path((season_id, category_id)): Path<(Uuid, Uuid)>,
    Valid(Json(payload)): Valid<Json<ReorderChallengesRequest>>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::reorder_challenges(&state, requester, season_id, category_id, payload)
            .await?,
    ))
}

/// Remove a challenge from the board. Commissioner only.
#[utoipa::path(
    delete,
    path = "/seasons/{season_id}/board/challenges/{challenge_id}",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier"),
        ("challenge_id" = Uuid, Path, description = "Board challenge identifier")
    ),
    responses(
        (status = 200, description = "Updated board", body = BoardResponse),
        (status = 409, description = "Board locked or challenge already played")
    )
)]
pub async fn remove_challenge(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path((season_id, challenge_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::remove_challenge(&state, requester, season_id, challenge_id).await?,
    ))
}

/// Lock the board for play. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/board/lock",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses(
        (status = 200, description = "Locked board", body = BoardResponse),
        (status = 409, description = "Fewer than fifteen challenges")
    )
)]
pub async fn lock_board(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::lock_board(&state, requester, season_id).await?,
    ))
}

/// Unlock the board for editing. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/board/unlock",
    tag = "board",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses((status = 200, description = "Unlocked board", body = BoardResponse))
)]
pub async fn unlock_board(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<BoardResponse>, AppError> {
    Ok(Json(
        board_service::unlock_board(&state, requester, season_id).await?,
    ))
}
