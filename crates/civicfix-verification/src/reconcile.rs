//! Per-label fix reconciliation.

use serde::{Deserialize, Serialize};

use civicfix_core::constants::normalize_label;
use civicfix_core::models::{FixOutcome, FixedState, Issue, OverallOutcome, PerIssueResult};

/// What reconciliation does to the issue's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatusUpdate {
    /// Close the issue and record the fix.
    Close,
    /// Leave the issue open.
    KeepOpen,
}

/// First verifier result for `label`, matched after normalization.
fn result_for<'a>(label: &str, results: &'a [PerIssueResult]) -> Option<&'a PerIssueResult> {
    results
        .iter()
        .find(|r| normalize_label(&r.issue_type) == label)
}

/// Closed only if every label on the issue has a result marked fully
/// fixed. A missing result, a `partial`, or an issue with no labels at all
/// keeps it open. Results for labels the issue does not carry are ignored.
pub fn reconcile(issue: &Issue, results: &[PerIssueResult]) -> (OverallOutcome, IssueStatusUpdate) {
    let all_fixed = !issue.issue_types.is_empty()
        && issue.issue_types.iter().all(|label| {
            result_for(label, results).is_some_and(|r| r.fixed.is_fixed())
        });
    if all_fixed {
        (OverallOutcome::Closed, IssueStatusUpdate::Close)
    } else {
        (OverallOutcome::Rejected, IssueStatusUpdate::KeepOpen)
    }
}

/// One outcome per issue label, in issue order. Labels the verifier
/// skipped are recorded as not fixed.
pub fn label_outcomes(issue: &Issue, results: &[PerIssueResult]) -> Vec<FixOutcome> {
    issue
        .issue_types
        .iter()
        .map(|label| match result_for(label, results) {
            Some(r) => FixOutcome {
                issue_type: label.clone(),
                fixed: r.fixed,
                confidence: r.confidence.clamp(0.0, 1.0),
                notes: r.notes.trim().to_string(),
            },
            None => FixOutcome {
                issue_type: label.clone(),
                fixed: FixedState::No,
                confidence: 0.0,
                notes: "not assessed by verifier".to_string(),
            },
        })
        .collect()
}

/// Labels that block closure.
pub fn unresolved_labels(issue: &Issue, results: &[PerIssueResult]) -> Vec<String> {
    label_outcomes(issue, results)
        .into_iter()
        .filter(|o| !o.fixed.is_fixed())
        .map(|o| o.issue_type)
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use civicfix_core::models::{GeoPoint, IssueStatus, StatusCounters};

    use super::*;

    fn issue_with(types: &[&str]) -> Issue {
        let now = Utc::now();
        Issue {
            issue_id: "i-1".into(),
            reported_by: None,
            location: GeoPoint { lat: 0.0, lon: 0.0 },
            created_at: now,
            updated_at: now,
            status: IssueStatus::Open,
            closed_by: None,
            closed_at: None,
            photo_url: None,
            description: String::new(),
            auto_caption: String::new(),
            user_selected_labels: vec![],
            detected_issues: vec![],
            issue_types: types.iter().map(|t| t.to_string()).collect(),
            severity_score: 5.0,
            fate_risk_co2: 0.0,
            upvotes: StatusCounters::default(),
            reports: StatusCounters::default(),
            impact_score: 50.0,
            visibility_radius_m: 120,
            weather: None,
            evidence_ids: vec![],
            text_embedding: None,
        }
    }

    fn result(issue_type: &str, fixed: FixedState) -> PerIssueResult {
        PerIssueResult {
            issue_type: issue_type.to_string(),
            original_confidence: None,
            fixed,
            confidence: 0.9,
            evidence_photos: vec![],
            notes: String::new(),
        }
    }

    #[test]
    fn every_label_fixed_closes() {
        let issue = issue_with(&["a", "b"]);
        let results = [result("a", FixedState::Yes), result("b", FixedState::Yes)];
        assert_eq!(
            reconcile(&issue, &results),
            (OverallOutcome::Closed, IssueStatusUpdate::Close)
        );
    }

    #[test]
    fn any_unfixed_label_rejects() {
        let issue = issue_with(&["a", "b"]);
        let results = [result("a", FixedState::Yes), result("b", FixedState::No)];
        assert_eq!(reconcile(&issue, &results).0, OverallOutcome::Rejected);
    }

    #[test]
    fn partial_counts_as_not_fixed() {
        let issue = issue_with(&["a", "b"]);
        let results = [result("a", FixedState::Yes), result("b", FixedState::Partial)];
        assert_eq!(
            reconcile(&issue, &results),
            (OverallOutcome::Rejected, IssueStatusUpdate::KeepOpen)
        );
        assert_eq!(unresolved_labels(&issue, &results), vec!["b"]);
    }

    #[test]
    fn missing_label_fails_closed() {
        let issue = issue_with(&["a", "b"]);
        let results = [result("a", FixedState::Yes)];
        assert_eq!(reconcile(&issue, &results).0, OverallOutcome::Rejected);
        let outcomes = label_outcomes(&issue, &results);
        assert_eq!(outcomes[1].fixed, FixedState::No);
        assert_eq!(outcomes[1].confidence, 0.0);
    }

    #[test]
    fn labelless_issue_never_closes() {
        assert_eq!(reconcile(&issue_with(&[]), &[]).0, OverallOutcome::Rejected);
    }

    #[test]
    fn result_labels_are_normalized_and_first_wins() {
        let issue = issue_with(&["sewer_blockage"]);
        let results = [
            result("Sewer Blockage", FixedState::Yes),
            result("sewer_blockage", FixedState::No),
        ];
        assert_eq!(reconcile(&issue, &results).0, OverallOutcome::Closed);
    }

    #[test]
    fn extra_results_are_ignored() {
        let issue = issue_with(&["a"]);
        let results = [result("a", FixedState::Yes), result("zzz", FixedState::No)];
        assert_eq!(reconcile(&issue, &results).0, OverallOutcome::Closed);
        assert_eq!(label_outcomes(&issue, &results).len(), 1);
    }
}
