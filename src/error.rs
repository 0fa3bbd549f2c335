use thiserror::Error;

/// Process-level error taxonomy. Each variant maps to the exit code the
/// binary terminates with: usage 1, operational 2, validation 3.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0:#}")]
    Operational(#[from] anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Usage(_) => 1,
            AppError::Operational(_) => 2,
            AppError::Validation(_) => 3,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
