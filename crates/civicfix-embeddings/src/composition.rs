//! Deterministic text composition for embedding.
//!
//! Issue layout, segments joined by ` -- ` and empty segments skipped:
//!
//! ```text
//! Issue -- <description> -- <caption> -- <label> (<conf>) severity:<s> future_impact:<text> | ... -- predicted_fix: <fix>
//! ```

use civicfix_core::constants::{FIX_ROLE_TAG, ISSUE_ROLE_TAG};
use civicfix_core::models::{DetectedIssueLabel, FixRecord, Issue};

const SEGMENT_SEPARATOR: &str = " -- ";
const LABEL_SEPARATOR: &str = " | ";
const FUTURE_IMPACT_CHARS: usize = 100;

fn join_segments(segments: Vec<String>) -> String {
    segments
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

fn label_summary(label: &DetectedIssueLabel) -> String {
    let future: String = label.future_impact.chars().take(FUTURE_IMPACT_CHARS).collect();
    let mut summary = format!(
        "{} ({:.2}) severity:{:.1}",
        label.label_type, label.confidence, label.severity_score
    );
    if !future.trim().is_empty() {
        summary.push_str(" future_impact:");
        summary.push_str(future.trim());
    }
    summary
}

/// Text embedded as an issue's document vector.
pub fn compose_issue_text(issue: &Issue) -> String {
    let labels = issue
        .detected_issues
        .iter()
        .map(label_summary)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR);
    let predicted_fix = issue
        .primary_predicted_fix()
        .map(|fix| format!("predicted_fix: {fix}"))
        .unwrap_or_default();

    join_segments(vec![
        ISSUE_ROLE_TAG.to_string(),
        issue.description.trim().to_string(),
        issue.auto_caption.trim().to_string(),
        labels,
        predicted_fix,
    ])
}

/// Query text for a new submission, before any classification exists.
/// Shares the issue role tag so it lands near stored issue vectors.
pub fn compose_query_text(description: &str, hinted_labels: &[String]) -> String {
    let hints = if hinted_labels.is_empty() {
        String::new()
    } else {
        format!("labels: {}", hinted_labels.join(", "))
    };
    join_segments(vec![
        ISSUE_ROLE_TAG.to_string(),
        description.trim().to_string(),
        hints,
    ])
}

/// Query text for a proposed fix, matched against stored fix vectors.
pub fn compose_fix_query_text(fix_description: &str, issue_types: &[String]) -> String {
    let labels = if issue_types.is_empty() {
        String::new()
    } else {
        format!("fixes: {}", issue_types.join(", "))
    };
    join_segments(vec![
        FIX_ROLE_TAG.to_string(),
        fix_description.trim().to_string(),
        labels,
    ])
}

/// Text embedded as a fix's document vector.
pub fn compose_fix_text(fix: &FixRecord) -> String {
    let outcomes = fix
        .fix_outcomes
        .iter()
        .map(|o| format!("{}: {}", o.issue_type, o.fixed.as_str()))
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR);
    join_segments(vec![
        FIX_ROLE_TAG.to_string(),
        fix.title.trim().to_string(),
        fix.summary.trim().to_string(),
        outcomes,
    ])
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use civicfix_core::models::{
        FixOutcome, FixedState, GeoPoint, IssueStatus, StatusCounters,
    };

    use super::*;

    fn label(t: &str, conf: f64, sev: f64, future: &str, fix: &str) -> DetectedIssueLabel {
        DetectedIssueLabel {
            label_type: t.into(),
            confidence: conf,
            severity_score: sev,
            future_impact: future.into(),
            predicted_fix: fix.into(),
            predicted_fix_confidence: 0.7,
            auto_review_flag: false,
        }
    }

    fn issue(description: &str, caption: &str, labels: Vec<DetectedIssueLabel>) -> Issue {
        let now = Utc::now();
        Issue {
            issue_id: "i".into(),
            reported_by: None,
            location: GeoPoint { lat: 0.0, lon: 0.0 },
            created_at: now,
            updated_at: now,
            status: IssueStatus::Open,
            closed_by: None,
            closed_at: None,
            photo_url: None,
            description: description.into(),
            auto_caption: caption.into(),
            user_selected_labels: vec![],
            issue_types: labels.iter().map(|l| l.label_type.clone()).collect(),
            detected_issues: labels,
            severity_score: 0.0,
            fate_risk_co2: 0.0,
            upvotes: StatusCounters::default(),
            reports: StatusCounters::default(),
            impact_score: 0.0,
            visibility_radius_m: 100,
            weather: None,
            evidence_ids: vec![],
            text_embedding: None,
        }
    }

    #[test]
    fn issue_text_has_fixed_segment_order() {
        let text = compose_issue_text(&issue(
            "Water everywhere",
            "Flooded street",
            vec![
                label("waterlogging", 0.91, 7.0, "Road damage", "Desilt drains"),
                label("sewer_blockage", 0.7, 6.4, "", "Clear blockage"),
            ],
        ));
        assert_eq!(
            text,
            "Issue -- Water everywhere -- Flooded street -- \
             waterlogging (0.91) severity:7.0 future_impact:Road damage | \
             sewer_blockage (0.70) severity:6.4 -- predicted_fix: Desilt drains"
        );
    }

    #[test]
    fn empty_segments_are_skipped() {
        let text = compose_issue_text(&issue("", "Caption only", vec![]));
        assert_eq!(text, "Issue -- Caption only");
    }

    #[test]
    fn future_impact_is_truncated() {
        let long = "x".repeat(300);
        let text = compose_issue_text(&issue("d", "", vec![label("a", 0.9, 1.0, &long, "")]));
        assert!(text.contains(&"x".repeat(100)));
        assert!(!text.contains(&"x".repeat(101)));
    }

    #[test]
    fn query_text_shares_role_tag() {
        assert_eq!(
            compose_query_text("Broken slab", &["broken_infrastructure".to_string()]),
            "Issue -- Broken slab -- labels: broken_infrastructure"
        );
        assert_eq!(compose_query_text("  ", &[]), "Issue");
    }

    #[test]
    fn fix_query_text_uses_fix_role_tag() {
        assert_eq!(
            compose_fix_query_text("Cleared the drain ", &["sewer_blockage".to_string()]),
            "Fix -- Cleared the drain -- fixes: sewer_blockage"
        );
    }

    #[test]
    fn fix_text_lists_outcomes() {
        let fix = FixRecord {
            fix_id: "f".into(),
            issue_id: "i".into(),
            created_by: "ngo".into(),
            created_at: Utc::now(),
            title: "Drain cleared".into(),
            summary: "Removed silt".into(),
            image_urls: vec![],
            photo_count: 0,
            co2_saved: 0.0,
            success_rate: 1.0,
            related_issue_types: vec!["sewer_blockage".into()],
            fix_outcomes: vec![FixOutcome {
                issue_type: "sewer_blockage".into(),
                fixed: FixedState::Yes,
                confidence: 0.9,
                notes: String::new(),
            }],
            text_embedding: None,
            source_doc_ids: vec![],
        };
        assert_eq!(
            compose_fix_text(&fix),
            "Fix -- Drain cleared -- Removed silt -- sewer_blockage: yes"
        );
    }
}
