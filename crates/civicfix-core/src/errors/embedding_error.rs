use super::UpstreamError;

/// Embedding subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Request(#[from] UpstreamError),

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid embedding vector: {reason}")]
    InvalidVector { reason: String },

    #[error("provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },

    #[error("embedding timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("nothing to embed: input text is empty")]
    EmptyInput,
}

impl EmbeddingError {
    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request(e) => e.is_transient(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }
}
