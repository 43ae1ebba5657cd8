use serde::{Deserialize, Serialize};

use super::defaults;

/// Evidence retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Geo filter radius around the query location (meters).
    pub issue_radius_m: f64,
    /// Only issues reported within this many days are considered.
    pub lookback_days: i64,
    /// Default number of issue snippets returned.
    pub issue_top_k: usize,
    /// Default number of fix snippets returned.
    pub fix_top_k: usize,
    /// Candidates requested per returned result in vector mode.
    pub overfetch_factor: usize,
    /// Maximum characters in a snippet excerpt.
    pub snippet_chars: usize,
    /// Timeout for a single retrieval attempt (seconds).
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            issue_radius_m: defaults::DEFAULT_ISSUE_RADIUS_M,
            lookback_days: defaults::DEFAULT_LOOKBACK_DAYS,
            issue_top_k: defaults::DEFAULT_ISSUE_TOP_K,
            fix_top_k: defaults::DEFAULT_FIX_TOP_K,
            overfetch_factor: defaults::DEFAULT_OVERFETCH_FACTOR,
            snippet_chars: defaults::DEFAULT_SNIPPET_CHARS,
            timeout_secs: defaults::DEFAULT_RETRIEVAL_TIMEOUT_SECS,
        }
    }
}
