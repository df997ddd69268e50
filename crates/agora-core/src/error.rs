use thiserror::Error;

/// Failure kinds the services report. The transport layer decides how
/// each kind is rendered; nothing here knows about HTTP.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    /// Underlying store failure, including a failed sequence bump.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;
