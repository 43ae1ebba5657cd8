use super::error_code::{self, ErrorCode};
use super::{ConfigError, EmbeddingError, StorageError, UpstreamError, ValidationError};

/// Top-level error aggregating every subsystem error.
#[derive(Debug, thiserror::Error)]
pub enum CivicError {
    #[error("issue not found: {id}")]
    IssueNotFound { id: String },

    #[error("fix not found: {id}")]
    FixNotFound { id: String },

    #[error("cannot {action} issue {issue_id} while it is {status}")]
    InvalidTransition {
        issue_id: String,
        status: String,
        action: String,
    },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("upstream error: {0}")]
    UpstreamError(#[from] UpstreamError),

    #[error("validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type CivicResult<T> = Result<T, CivicError>;

impl ErrorCode for CivicError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::IssueNotFound { .. } | Self::FixNotFound { .. } => error_code::NOT_FOUND,
            Self::InvalidTransition { .. } => error_code::CONFLICT,
            Self::StorageError(StorageError::Conflict { .. }) => error_code::CONFLICT,
            Self::StorageError(_) => error_code::STORAGE_ERROR,
            Self::EmbeddingError(_) => error_code::EMBEDDING_ERROR,
            Self::UpstreamError(e) => match e {
                UpstreamError::InvalidResponse { .. } => error_code::INVALID_MODEL_RESPONSE,
                UpstreamError::Status { .. } if !e.is_transient() => {
                    error_code::UPSTREAM_REJECTED
                }
                _ => error_code::SERVICE_UNAVAILABLE,
            },
            Self::ValidationError(_) => error_code::VALIDATION_ERROR,
            Self::ConfigError(_) => error_code::CONFIG_ERROR,
            Self::SerializationError(_) => error_code::SERIALIZATION_ERROR,
        }
    }
}
