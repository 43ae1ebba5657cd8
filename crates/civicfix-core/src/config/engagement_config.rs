use serde::{Deserialize, Serialize};

use super::defaults;

/// Community report thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// Open reports that close an open issue as community-flagged.
    pub spam_report_threshold: u64,
    /// Closed reports that reopen a closed issue.
    pub reopen_report_threshold: u64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            spam_report_threshold: defaults::DEFAULT_SPAM_REPORT_THRESHOLD,
            reopen_report_threshold: defaults::DEFAULT_REOPEN_REPORT_THRESHOLD,
        }
    }
}
