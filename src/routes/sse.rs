use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::{Event, Sse},
    routing::get,
};
use futures::Stream;
use tracing::info;
use uuid::Uuid;

use crate::{error::AppError, services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/sse/seasons/{season_id}",
    tag = "sse",
    params(("season_id" = Uuid, Path, description = "Season identifier")),
    responses(
        (status = 200, description = "Season SSE stream", content_type = "text/event-stream", body = String),
        (status = 404, description = "Unknown season")
    )
)]
/// Stream phase changes, season updates and rollbacks of one season.
pub async fn season_stream(
    State(state): State<SharedState>,
    Path(season_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let receiver = sse_service::subscribe_season(&state, season_id).await?;
    info!(season_id = %season_id, "new season SSE connection");
    sse_service::broadcast_handshake(&state.season_sse(season_id), season_id, state.is_degraded());
    Ok(sse_service::to_sse_stream(receiver, season_id))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/seasons/{season_id}", get(season_stream))
}
