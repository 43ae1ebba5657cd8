/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("config validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("config file not found: {path}")]
    FileNotFound { path: String },
}
