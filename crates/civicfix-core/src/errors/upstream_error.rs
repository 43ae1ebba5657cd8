/// Errors from external collaborators reached over the network:
/// classifier, verifier, weather, and remote embedding services.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} unreachable: {reason}")]
    Unreachable { service: String, reason: String },

    #[error("{service} timed out after {timeout_secs}s")]
    Timeout { service: String, timeout_secs: u64 },

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: String,
        status: u16,
        body: String,
    },

    #[error("{service} returned an invalid response: {reason}")]
    InvalidResponse { service: String, reason: String },
}

impl UpstreamError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Connection failures, timeouts, 429 and 5xx are transient. Other 4xx
    /// statuses and malformed payloads are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable { .. } | Self::Timeout { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::InvalidResponse { .. } => false,
        }
    }

    /// Name of the service that produced this error.
    pub fn service(&self) -> &str {
        match self {
            Self::Unreachable { service, .. }
            | Self::Timeout { service, .. }
            | Self::Status { service, .. }
            | Self::InvalidResponse { service, .. } => service,
        }
    }
}
