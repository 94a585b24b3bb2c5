use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;

use crate::{
    dao::storage::StorageError,
    state::{
        AbortError, ApplyError, PlanError,
        checkpoint::RollbackError,
        rules::RuleError,
    },
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Application is running in degraded mode without storage.
    #[error("storage unavailable (degraded mode)")]
    Degraded,
    /// Requester lacks standing for the action.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Phase, lock or checkpoint precondition unmet.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Uniqueness constraint violated.
    #[error("duplicate: {0}")]
    DuplicateEntity(String),
    /// Concurrent modification detected at commit time.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Rollback could not leave the season consistent; nothing was committed.
    #[error("rollback failed: {0}")]
    RollbackFailed(String),
    /// Operation exceeded its timeout limit.
    #[error("operation timed out")]
    Timeout,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::VersionConflict { .. } => ServiceError::Conflict(err.to_string()),
            StorageError::Duplicate { .. } => ServiceError::DuplicateEntity(err.to_string()),
            StorageError::Unavailable { .. } => ServiceError::Unavailable(err),
        }
    }
}

impl From<RuleError> for ServiceError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::InvalidTransition(message) => ServiceError::InvalidTransition(message),
            RuleError::NotFound(message) => ServiceError::NotFound(message),
            RuleError::Duplicate(message) => ServiceError::DuplicateEntity(message),
            RuleError::InvalidInput(message) => ServiceError::InvalidInput(message),
            RuleError::Forbidden(message) => ServiceError::Unauthorized(message),
            RuleError::Conflict(message) => ServiceError::Conflict(message),
        }
    }
}

impl From<RollbackError> for ServiceError {
    fn from(err: RollbackError) -> Self {
        match err {
            RollbackError::Unavailable { .. } => ServiceError::InvalidTransition(err.to_string()),
            RollbackError::Plan(plan) => plan.into(),
            RollbackError::Apply(_) | RollbackError::Integrity(_) => {
                ServiceError::RollbackFailed(err.to_string())
            }
        }
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requester is not allowed to perform the action.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::Degraded => AppError::ServiceUnavailable("degraded mode".into()),
            ServiceError::Unauthorized(message) => AppError::Forbidden(message),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::InvalidTransition(message)
            | ServiceError::DuplicateEntity(message)
            | ServiceError::Conflict(message) => AppError::Conflict(message),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::RollbackFailed(message) => AppError::Internal(message),
            ServiceError::Timeout => AppError::ServiceUnavailable("operation timed out".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

impl From<PlanError> for ServiceError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::AlreadyPending => {
                ServiceError::Conflict("state transition already pending".into())
            }
            PlanError::InvalidTransition(invalid) => {
                ServiceError::InvalidTransition(invalid.to_string())
            }
        }
    }
}

impl From<ApplyError> for ServiceError {
    fn from(err: ApplyError) -> Self {
        match err {
            ApplyError::NoPending => ServiceError::Conflict("no transition is pending".into()),
            ApplyError::IdMismatch { .. } => {
                ServiceError::Conflict("pending transition does not match".into())
            }
            ApplyError::StateMismatch { expected, actual } => ServiceError::Conflict(format!(
                "season moved during transition (expected {}, got {})",
                expected.position, actual.position
            )),
        }
    }
}

impl From<AbortError> for ServiceError {
    fn from(err: AbortError) -> Self {
        match err {
            AbortError::NoPending => ServiceError::Conflict("no pending transition".into()),
            AbortError::IdMismatch { .. } => {
                ServiceError::Conflict("transition plan does not match".into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn status_codes_follow_the_error_taxonomy() {
        let cases = [
            (ServiceError::Unauthorized("x".into()), StatusCode::FORBIDDEN),
            (ServiceError::InvalidTransition("x".into()), StatusCode::CONFLICT),
            (ServiceError::DuplicateEntity("x".into()), StatusCode::CONFLICT),
            (ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ServiceError::RollbackFailed("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Degraded, StatusCode::SERVICE_UNAVAILABLE),
            (ServiceError::Timeout, StatusCode::SERVICE_UNAVAILABLE),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn version_conflicts_surface_as_conflict() {
        let err = ServiceError::from(StorageError::VersionConflict { id: Uuid::new_v4() });
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
