use axum::Router;

use crate::state::SharedState;

pub mod board;
pub mod checkpoints;
pub mod docs;
pub mod draft;
pub mod evolution;
pub mod health;
pub mod leagues;
pub mod requester;
pub mod seasons;
pub mod sse;
pub mod weeks;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(sse::router())
        .merge(leagues::router())
        .merge(seasons::router())
        .merge(draft::router())
        .merge(weeks::router())
        .merge(evolution::router())
        .merge(board::router())
        .merge(checkpoints::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
