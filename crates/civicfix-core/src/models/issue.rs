use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DetectedIssueLabel, GeoPoint, WeatherSummary};

/// Lifecycle state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStatus {
    Open,
    Closed,
    Verified,
    Spam,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Verified => "verified",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "verified" => Ok(Self::Verified),
            "spam" => Ok(Self::Spam),
            other => Err(format!("unknown issue status: {other}")),
        }
    }
}

/// Engagement counters partitioned by the status the issue had when the
/// engagement happened. Spam issues accept no engagement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusCounters {
    pub open: u64,
    pub closed: u64,
    pub verified: u64,
}

impl StatusCounters {
    pub fn total(&self) -> u64 {
        self.open + self.closed + self.verified
    }

    pub fn get(&self, status: IssueStatus) -> u64 {
        match status {
            IssueStatus::Open => self.open,
            IssueStatus::Closed => self.closed,
            IssueStatus::Verified => self.verified,
            IssueStatus::Spam => 0,
        }
    }

    fn slot(&mut self, status: IssueStatus) -> Option<&mut u64> {
        match status {
            IssueStatus::Open => Some(&mut self.open),
            IssueStatus::Closed => Some(&mut self.closed),
            IssueStatus::Verified => Some(&mut self.verified),
            IssueStatus::Spam => None,
        }
    }

    pub fn increment(&mut self, status: IssueStatus) {
        if let Some(slot) = self.slot(status) {
            *slot = slot.saturating_add(1);
        }
    }

    /// Decrement, never below zero.
    pub fn decrement(&mut self, status: IssueStatus) {
        if let Some(slot) = self.slot(status) {
            *slot = slot.saturating_sub(1);
        }
    }

    pub fn reset(&mut self, status: IssueStatus) {
        if let Some(slot) = self.slot(status) {
            *slot = 0;
        }
    }
}

/// The central document: one citizen-reported civic issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_id: String,
    #[serde(default)]
    pub reported_by: Option<String>,
    pub location: GeoPoint,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: IssueStatus,
    #[serde(default)]
    pub closed_by: Option<String>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub auto_caption: String,
    #[serde(default)]
    pub user_selected_labels: Vec<String>,
    pub detected_issues: Vec<DetectedIssueLabel>,
    /// Unique label types, in `detected_issues` order.
    pub issue_types: Vec<String>,
    /// Max severity across `detected_issues`.
    pub severity_score: f64,
    /// Predicted CO2 risk (kg) if left unfixed.
    #[serde(default)]
    pub fate_risk_co2: f64,
    #[serde(default)]
    pub upvotes: StatusCounters,
    #[serde(default)]
    pub reports: StatusCounters,
    pub impact_score: f64,
    pub visibility_radius_m: u32,
    #[serde(default)]
    pub weather: Option<WeatherSummary>,
    #[serde(default)]
    pub evidence_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_embedding: Option<Vec<f32>>,
}

impl Issue {
    pub fn is_open(&self) -> bool {
        self.status == IssueStatus::Open
    }

    /// Predicted fix of the first (highest priority) label, if any.
    pub fn primary_predicted_fix(&self) -> Option<&str> {
        self.detected_issues
            .first()
            .map(|l| l.predicted_fix.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Whether any label type matches one of `labels`.
    pub fn matches_any(&self, labels: &[String]) -> bool {
        self.issue_types.iter().any(|t| labels.contains(t))
    }
}
