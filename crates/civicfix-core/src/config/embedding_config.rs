use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::EMBEDDING_DIMENSIONS;

/// Embedding subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Embedding provider: "gemini" or "hashing".
    pub provider: String,
    /// Remote model name.
    pub model: String,
    /// Base URL of the remote embedding API.
    pub api_base: String,
    /// API key for the remote provider. Usually supplied via environment.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Expected vector dimensionality. Anything else is rejected.
    pub dimensions: usize,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
    /// L1 in-memory cache max entries.
    pub cache_size: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: defaults::DEFAULT_EMBEDDING_PROVIDER.to_string(),
            model: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_base: defaults::DEFAULT_EMBEDDING_API_BASE.to_string(),
            api_key: None,
            dimensions: EMBEDDING_DIMENSIONS,
            timeout_secs: defaults::DEFAULT_EMBEDDING_TIMEOUT_SECS,
            cache_size: defaults::DEFAULT_L1_CACHE_SIZE,
        }
    }
}
