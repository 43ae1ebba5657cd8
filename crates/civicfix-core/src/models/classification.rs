use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EvidenceSnippet, GeoPoint, WeatherSummary};

/// A label as proposed by the classifier, before normalization and
/// confidence filtering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLabel {
    #[serde(rename = "type")]
    pub label_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub severity_score: f64,
    #[serde(default)]
    pub future_impact: String,
    #[serde(default)]
    pub predicted_fix: String,
    #[serde(default)]
    pub predicted_fix_confidence: f64,
}

/// Structured classifier response. Parsing into this type is the single
/// acceptance boundary for classifier output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    #[serde(default)]
    pub auto_caption: String,
    #[serde(default)]
    pub detected_issues: Vec<CandidateLabel>,
    #[serde(default)]
    pub fate_risk_co2: f64,
    /// Evidence ids the classifier says it relied on.
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub no_issues_found: bool,
}

/// Everything the classifier receives for one submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub image_url: String,
    pub description: String,
    pub location: GeoPoint,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub user_selected_labels: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<EvidenceSnippet>,
    #[serde(default)]
    pub weather: Option<WeatherSummary>,
}
