use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::week::{
        ChallengeSelectionDto, PresenterResponse, SelectChallengeRequest, SubmissionDto,
        SubmitPlaylistRequest, VoteDto, VoteRequest, WeekResponse,
    },
    error::AppError,
    routes::requester::Requester,
    services::week_service,
    state::SharedState,
};

/// Weekly loop: challenge, submissions, presentation and voting.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/seasons/{season_id}/weeks/current", get(current_week))
        .route(
            "/seasons/{season_id}/weeks/current/challenge",
            post(select_challenge),
        )
        .route(
            "/seasons/{season_id}/weeks/current/submission",
            post(submit_playlist),
        )
        .route(
            "/seasons/{season_id}/weeks/current/presentation/next",
            post(next_presenter),
        )
        .route("/seasons/{season_id}/weeks/current/votes", post(cast_vote))
}

/// Current week: selection, submissions, presentation, votes and results.
#[utoipa::path(
    get,
    path = "/seasons/{season_id}/weeks/current",
    tag = "weeks",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses((status = 200, description = "Current week", body = WeekResponse))
)]
pub async fn current_week(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<WeekResponse>, AppError> {
    Ok(Json(
        week_service::current_week(&state, requester, season_id).await?,
    ))
}

/// Choose this week's challenge from the board. Selector or commissioner.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/weeks/current/challenge",
    tag = "weeks",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = SelectChallengeRequest,
    responses(
        (status = 201, description = "Challenge selected", body = ChallengeSelectionDto),
        (status = 403, description = "Caller is not this week's selector"),
        (status = 409, description = "Already selected, challenge used or wrong phase")
    )
)]
pub async fn select_challenge(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SelectChallengeRequest>>,
) -> Result<(StatusCode, Json<ChallengeSelectionDto>), AppError> {
    let selection = week_service::select_challenge(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(selection)))
}

/// Submit or replace the caller's playlist for the week.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/weeks/current/submission",
    tag = "weeks",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = SubmitPlaylistRequest,
    responses(
        (status = 200, description = "Submission stored", body = SubmissionDto),
        (status = 409, description = "Submissions are closed")
    )
)]
pub async fn submit_playlist(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SubmitPlaylistRequest>>,
) -> Result<Json<SubmissionDto>, AppError> {
    Ok(Json(
        week_service::submit_playlist(&state, requester, season_id, payload).await?,
    ))
}

/// Mark the next label as presented. Commissioner only.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/weeks/current/presentation/next",
    tag = "weeks",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    responses(
        (status = 200, description = "Label presented", body = PresenterResponse),
        (status = 409, description = "Everyone has presented or wrong phase")
    )
)]
pub async fn next_presenter(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
) -> Result<Json<PresenterResponse>, AppError> {
    Ok(Json(
        week_service::next_presenter(&state, requester, season_id).await?,
    ))
}

/// Cast the caller's vote for another label.
#[utoipa::path(
    post,
    path = "/seasons/{season_id}/weeks/current/votes",
    tag = "weeks",
    params(
        ("X-User-Id" = Uuid, Header, description = "Caller's user id"),
        ("season_id" = Uuid, Path, description = "Season identifier")
    ),
    request_body = VoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = VoteDto),
        (status = 400, description = "Self vote"),
        (status = 409, description = "Already voted or voting closed")
    )
)]
pub async fn cast_vote(
    State(state): State<SharedState>,
    Requester(requester): Requester,
    Path(season_id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<VoteRequest>>,
) -> Result<(StatusCode, Json<VoteDto>), AppError> {
    let vote = week_service::cast_vote(&state, requester, season_id, payload).await?;
    Ok((StatusCode::CREATED, Json(vote)))
}
