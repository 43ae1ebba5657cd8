use serde::{Deserialize, Serialize};

use super::defaults;

/// Endpoints and timeouts for the external classifier, verifier, and
/// weather services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub classifier_url: String,
    pub verifier_url: String,
    pub weather_url: String,
    /// Fetch weather context during submission.
    pub weather_enabled: bool,
    pub classifier_timeout_secs: u64,
    pub verifier_timeout_secs: u64,
    pub weather_timeout_secs: u64,
    pub retry: RetryConfig,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            classifier_url: defaults::DEFAULT_CLASSIFIER_URL.to_string(),
            verifier_url: defaults::DEFAULT_VERIFIER_URL.to_string(),
            weather_url: defaults::DEFAULT_WEATHER_URL.to_string(),
            weather_enabled: true,
            classifier_timeout_secs: defaults::DEFAULT_CLASSIFIER_TIMEOUT_SECS,
            verifier_timeout_secs: defaults::DEFAULT_VERIFIER_TIMEOUT_SECS,
            weather_timeout_secs: defaults::DEFAULT_WEATHER_TIMEOUT_SECS,
            retry: RetryConfig::default(),
        }
    }
}

/// Bounded exponential backoff for transient upstream failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_RETRY_MAX_ATTEMPTS,
            base_delay_ms: defaults::DEFAULT_RETRY_BASE_DELAY_MS,
            max_delay_ms: defaults::DEFAULT_RETRY_MAX_DELAY_MS,
        }
    }
}
