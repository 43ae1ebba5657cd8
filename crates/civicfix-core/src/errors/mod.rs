mod civic_error;
mod config_error;
mod embedding_error;
pub mod error_code;
mod storage_error;
mod upstream_error;
mod validation_error;

pub use civic_error::{CivicError, CivicResult};
pub use config_error::ConfigError;
pub use embedding_error::EmbeddingError;
pub use error_code::ErrorCode;
pub use storage_error::StorageError;
pub use upstream_error::UpstreamError;
pub use validation_error::ValidationError;
