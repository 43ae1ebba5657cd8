use serde::{Deserialize, Serialize};

use super::defaults;

/// Label acceptance rules applied to classifier output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexingConfig {
    /// Labels below this confidence are dropped.
    pub min_confidence: f64,
    /// Labels below this confidence (and at or above `min_confidence`)
    /// are flagged for review.
    pub review_threshold: f64,
    /// Maximum labels kept per issue, highest severity first.
    pub max_labels: usize,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            min_confidence: defaults::DEFAULT_MIN_CONFIDENCE,
            review_threshold: defaults::DEFAULT_REVIEW_THRESHOLD,
            max_labels: defaults::DEFAULT_MAX_LABELS,
        }
    }
}
