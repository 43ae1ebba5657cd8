//! Stable error codes for the upstream HTTP layer.

/// Maps an error to a structured code string so request handlers can pick
/// a status without matching on messages.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "SERVICE_UNAVAILABLE").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const CONFLICT: &str = "CONFLICT";
pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
pub const UPSTREAM_REJECTED: &str = "UPSTREAM_REJECTED";
pub const INVALID_MODEL_RESPONSE: &str = "INVALID_MODEL_RESPONSE";
pub const EMBEDDING_ERROR: &str = "EMBEDDING_ERROR";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
