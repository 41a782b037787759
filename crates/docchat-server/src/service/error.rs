use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("not signed in")]
    Unauthorized,

    /// Caller-facing message, surfaced verbatim.
    #[error("{0}")]
    Validation(String),

    /// Detail for the logs only.
    #[error("internal error: {0}")]
    Internal(String),
}
