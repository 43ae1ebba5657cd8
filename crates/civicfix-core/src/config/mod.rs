pub mod defaults;
mod embedding_config;
mod engagement_config;
mod indexing_config;
mod listing_config;
mod observability_config;
mod retrieval_config;
mod scoring_config;
mod storage_config;
mod upstream_config;

pub use embedding_config::EmbeddingConfig;
pub use engagement_config::EngagementConfig;
pub use indexing_config::IndexingConfig;
pub use listing_config::ListingConfig;
pub use observability_config::ObservabilityConfig;
pub use retrieval_config::RetrievalConfig;
pub use scoring_config::ScoringConfig;
pub use storage_config::StorageConfig;
pub use upstream_config::{RetryConfig, UpstreamConfig};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all subsystem configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CIVICFIX_*`)
/// 2. TOML config file
/// 3. Compiled defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CivicConfig {
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub indexing: IndexingConfig,
    pub engagement: EngagementConfig,
    pub upstream: UpstreamConfig,
    pub listing: ListingConfig,
    pub observability: ObservabilityConfig,
}

impl CivicConfig {
    /// Load with layered resolution: defaults, then the optional file,
    /// then `CIVICFIX_*` environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing sections fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Parse a TOML string. Missing sections fall back to defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize back to TOML. Secrets are skipped.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialize>".to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup. Unparseable values are
    /// ignored and the previous value is kept.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CIVICFIX_STORAGE_DB_PATH") {
            self.storage.db_path = Some(v);
        }
        if let Some(v) = lookup("CIVICFIX_EMBEDDING_PROVIDER") {
            self.embedding.provider = v;
        }
        if let Some(v) = lookup("CIVICFIX_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = lookup("CIVICFIX_EMBEDDING_API_KEY") {
            self.embedding.api_key = Some(v);
        }
        if let Some(v) = lookup("CIVICFIX_EMBEDDING_DIMENSIONS").and_then(|v| v.parse().ok()) {
            self.embedding.dimensions = v;
        }
        if let Some(v) = lookup("CIVICFIX_RETRIEVAL_ISSUE_RADIUS_M").and_then(|v| v.parse().ok()) {
            self.retrieval.issue_radius_m = v;
        }
        if let Some(v) = lookup("CIVICFIX_RETRIEVAL_LOOKBACK_DAYS").and_then(|v| v.parse().ok()) {
            self.retrieval.lookback_days = v;
        }
        if let Some(v) = lookup("CIVICFIX_UPSTREAM_CLASSIFIER_URL") {
            self.upstream.classifier_url = v;
        }
        if let Some(v) = lookup("CIVICFIX_UPSTREAM_VERIFIER_URL") {
            self.upstream.verifier_url = v;
        }
        if let Some(v) = lookup("CIVICFIX_UPSTREAM_WEATHER_URL") {
            self.upstream.weather_url = v;
        }
        if let Some(v) = lookup("CIVICFIX_UPSTREAM_WEATHER_ENABLED").and_then(|v| v.parse().ok()) {
            self.upstream.weather_enabled = v;
        }
        if let Some(v) = lookup("CIVICFIX_LOG_JSON").and_then(|v| v.parse().ok()) {
            self.observability.json = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |field: &str, value: f64| -> Result<(), ConfigError> {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, "must be between 0.0 and 1.0"));
            }
            Ok(())
        };
        let positive = |field: &str, value: u64| -> Result<(), ConfigError> {
            if value == 0 {
                return Err(invalid(field, "must be greater than 0"));
            }
            Ok(())
        };

        unit("indexing.min_confidence", self.indexing.min_confidence)?;
        unit("indexing.review_threshold", self.indexing.review_threshold)?;
        if self.indexing.min_confidence > self.indexing.review_threshold {
            return Err(invalid(
                "indexing.min_confidence",
                "must not exceed indexing.review_threshold",
            ));
        }
        positive("indexing.max_labels", self.indexing.max_labels as u64)?;

        positive_f64("scoring.normalizer", self.scoring.normalizer)?;
        positive_f64("scoring.recency_tau_days", self.scoring.recency_tau_days)?;

        positive("embedding.dimensions", self.embedding.dimensions as u64)?;
        positive("embedding.timeout_secs", self.embedding.timeout_secs)?;
        if !matches!(self.embedding.provider.as_str(), "gemini" | "hashing") {
            return Err(invalid(
                "embedding.provider",
                "must be one of \"gemini\", \"hashing\"",
            ));
        }

        positive_f64("retrieval.issue_radius_m", self.retrieval.issue_radius_m)?;
        positive_f64("listing.default_radius_km", self.listing.default_radius_km)?;
        positive("retrieval.lookback_days", self.retrieval.lookback_days.max(0) as u64)?;
        if self.retrieval.lookback_days > defaults::MAX_LOOKBACK_DAYS {
            return Err(invalid(
                "retrieval.lookback_days",
                &format!("must not exceed {}", defaults::MAX_LOOKBACK_DAYS),
            ));
        }
        positive("retrieval.overfetch_factor", self.retrieval.overfetch_factor as u64)?;
        positive("retrieval.snippet_chars", self.retrieval.snippet_chars as u64)?;
        positive("retrieval.timeout_secs", self.retrieval.timeout_secs)?;

        positive(
            "engagement.spam_report_threshold",
            self.engagement.spam_report_threshold,
        )?;
        positive(
            "engagement.reopen_report_threshold",
            self.engagement.reopen_report_threshold,
        )?;

        positive(
            "upstream.classifier_timeout_secs",
            self.upstream.classifier_timeout_secs,
        )?;
        positive(
            "upstream.verifier_timeout_secs",
            self.upstream.verifier_timeout_secs,
        )?;
        positive("upstream.weather_timeout_secs", self.upstream.weather_timeout_secs)?;
        positive(
            "upstream.retry.max_attempts",
            u64::from(self.upstream.retry.max_attempts),
        )?;

        positive("listing.max_page_size", self.listing.max_page_size as u64)?;
        if self.listing.default_page_size > self.listing.max_page_size {
            return Err(invalid(
                "listing.default_page_size",
                "must not exceed listing.max_page_size",
            ));
        }

        positive("storage.read_pool_size", self.storage.read_pool_size as u64)?;
        Ok(())
    }
}

fn positive_f64(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_nan() || value <= 0.0 {
        return Err(invalid(field, "must be greater than 0"));
    }
    Ok(())
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
