use thiserror::Error;

/// Result alias for season rule checks.
pub type RuleResult<T> = Result<T, RuleError>;

/// Business-rule violations raised by the season engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Phase, lock or checkpoint precondition unmet.
    #[error("{0}")]
    InvalidTransition(String),
    /// Referenced entity absent.
    #[error("{0}")]
    NotFound(String),
    /// Uniqueness constraint violated.
    #[error("{0}")]
    Duplicate(String),
    /// Malformed request data.
    #[error("{0}")]
    InvalidInput(String),
    /// Requester lacks standing for the action.
    #[error("{0}")]
    Forbidden(String),
    /// The request was built against state that has since changed.
    #[error("{0}")]
    Conflict(String),
}

impl RuleError {
    pub(crate) fn transition(message: impl Into<String>) -> Self {
        RuleError::InvalidTransition(message.into())
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        RuleError::NotFound(message.into())
    }

    pub(crate) fn duplicate(message: impl Into<String>) -> Self {
        RuleError::Duplicate(message.into())
    }

    pub(crate) fn input(message: impl Into<String>) -> Self {
        RuleError::InvalidInput(message.into())
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        RuleError::Forbidden(message.into())
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        RuleError::Conflict(message.into())
    }
}
