use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Whether a storage backend is installed and answering.
    pub storage: bool,
}

impl HealthResponse {
    /// Storage reachable.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            storage: true,
        }
    }

    /// No usable storage backend; season operations answer 503.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            storage: false,
        }
    }
}
