use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Check the installed season store and report whether season operations can
/// be served.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    match state.require_store().await {
        Ok(store) => match store.health_check().await {
            Ok(()) => HealthResponse::ok(),
            Err(err) => {
                warn!(error = %err, "season store health check failed");
                HealthResponse::degraded()
            }
        },
        Err(_) => {
            warn!("no season store installed (degraded mode)");
            HealthResponse::degraded()
        }
    }
}
