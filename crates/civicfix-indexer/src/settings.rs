use std::time::Duration;

use civicfix_core::config::IndexingConfig;
use civicfix_core::{BackoffPolicy, CivicConfig};

/// The slice of [`CivicConfig`] the submission pipeline reads.
#[derive(Debug, Clone)]
pub struct IndexerSettings {
    pub indexing: IndexingConfig,
    pub retry: BackoffPolicy,
    pub classifier_timeout: Duration,
    pub weather_timeout: Duration,
    pub weather_enabled: bool,
}

impl IndexerSettings {
    pub fn from_config(config: &CivicConfig) -> Self {
        Self {
            indexing: config.indexing.clone(),
            retry: BackoffPolicy::from(&config.upstream.retry),
            classifier_timeout: Duration::from_secs(config.upstream.classifier_timeout_secs),
            weather_timeout: Duration::from_secs(config.upstream.weather_timeout_secs),
            weather_enabled: config.upstream.weather_enabled,
        }
    }
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self::from_config(&CivicConfig::default())
    }
}
