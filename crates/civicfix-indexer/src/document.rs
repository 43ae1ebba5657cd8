//! Issue document assembly.

use chrono::{DateTime, Utc};

use civicfix_core::constants::normalize_label;
use civicfix_core::models::{
    ClassifierOutput, DetectedIssueLabel, EvidenceSnippet, GeoPoint, Issue, IssueStatus,
    StatusCounters, WeatherSummary,
};
use civicfix_impact::{ImpactContext, ImpactEngine};

/// Submission details carried onto the document alongside the
/// classifier's findings.
#[derive(Debug, Clone, Default)]
pub struct IssueMetadata {
    pub reported_by: Option<String>,
    pub photo_url: Option<String>,
    pub description: String,
    pub user_selected_labels: Vec<String>,
    pub weather: Option<WeatherSummary>,
}

/// Evidence ids in retrieval order, then any extra sources the classifier
/// cited, without duplicates.
pub fn evidence_ids(evidence: &[EvidenceSnippet], cited: &[String]) -> Vec<String> {
    let mut ids: Vec<String> = Vec::with_capacity(evidence.len() + cited.len());
    for id in evidence.iter().map(|s| &s.id).chain(cited) {
        if !id.trim().is_empty() && !ids.contains(id) {
            ids.push(id.clone());
        }
    }
    ids
}

/// Build a fresh open issue from accepted labels and score it at age zero.
/// The embedding is attached by the caller.
#[allow(clippy::too_many_arguments)]
pub fn assemble_issue(
    issue_id: String,
    labels: Vec<DetectedIssueLabel>,
    output: &ClassifierOutput,
    location: GeoPoint,
    timestamp: DateTime<Utc>,
    evidence: &[EvidenceSnippet],
    metadata: IssueMetadata,
    impact: &ImpactEngine,
) -> Issue {
    let mut issue_types: Vec<String> = Vec::with_capacity(labels.len());
    for label in &labels {
        if !issue_types.contains(&label.label_type) {
            issue_types.push(label.label_type.clone());
        }
    }
    let severity_score = labels.iter().map(|l| l.severity_score).fold(0.0, f64::max);
    let fate_risk_co2 = if output.fate_risk_co2.is_finite() {
        output.fate_risk_co2.max(0.0)
    } else {
        0.0
    };

    let mut issue = Issue {
        issue_id,
        reported_by: metadata.reported_by,
        location,
        created_at: timestamp,
        updated_at: timestamp,
        status: IssueStatus::Open,
        closed_by: None,
        closed_at: None,
        photo_url: metadata.photo_url,
        description: metadata.description.trim().to_string(),
        auto_caption: output.auto_caption.trim().to_string(),
        user_selected_labels: metadata
            .user_selected_labels
            .iter()
            .map(|l| normalize_label(l))
            .filter(|l| !l.is_empty())
            .collect(),
        detected_issues: labels,
        issue_types,
        severity_score,
        fate_risk_co2,
        upvotes: StatusCounters::default(),
        reports: StatusCounters::default(),
        impact_score: 0.0,
        visibility_radius_m: 0,
        weather: metadata.weather,
        evidence_ids: evidence_ids(evidence, &output.sources),
        text_embedding: None,
    };

    let assessment = impact.assess_issue(&issue, 0.0, &ImpactContext::at(timestamp));
    issue.impact_score = assessment.impact_score;
    issue.visibility_radius_m = assessment.visibility_radius_m;
    issue
}
