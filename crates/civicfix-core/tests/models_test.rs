use civicfix_core::models::*;

#[test]
fn classifier_output_parses_wire_shape() {
    let raw = r#"{
        "auto_caption": "Overflowing bin next to a bus stop",
        "detected_issues": [
            {"type": "overflowing_garbage_bin", "confidence": 0.91, "severity_score": 6.5,
             "future_impact": "Pest attraction", "predicted_fix": "Empty bin",
             "predicted_fix_confidence": 0.8}
        ],
        "fate_risk_co2": 12.5,
        "sources": ["issue-1"],
        "no_issues_found": false
    }"#;
    let output: ClassifierOutput = serde_json::from_str(raw).unwrap();
    assert_eq!(output.detected_issues.len(), 1);
    assert_eq!(output.detected_issues[0].label_type, "overflowing_garbage_bin");
    assert_eq!(output.fate_risk_co2, 12.5);
}

#[test]
fn classifier_output_rejects_wrong_types() {
    let raw = r#"{"detected_issues": [{"type": "waterlogging", "confidence": "high"}]}"#;
    assert!(serde_json::from_str::<ClassifierOutput>(raw).is_err());
    let raw = r#"{"detected_issues": "none"}"#;
    assert!(serde_json::from_str::<ClassifierOutput>(raw).is_err());
}

#[test]
fn verifier_output_accepts_legacy_outcome_field() {
    let raw = r#"{
        "fix_summary": "Drain cleared",
        "per_issue_results": [
            {"issue_type": "sewer_blockage", "fixed": "partial", "confidence": 0.7}
        ],
        "overall_outcome": "partial",
        "suggested_success_rate": 0.5
    }"#;
    let output: VerifierOutput = serde_json::from_str(raw).unwrap();
    assert_eq!(output.overall_outcome_hint, Some(OutcomeHint::Partial));
    assert_eq!(output.per_issue_results[0].fixed, FixedState::Partial);
    assert!(!output.per_issue_results[0].fixed.is_fixed());
}

#[test]
fn verifier_output_rejects_unknown_fixed_state() {
    let raw = r#"{"per_issue_results": [{"issue_type": "a", "fixed": "maybe"}]}"#;
    assert!(serde_json::from_str::<VerifierOutput>(raw).is_err());
}

#[test]
fn counters_never_go_negative() {
    let mut counters = StatusCounters::default();
    counters.decrement(IssueStatus::Open);
    assert_eq!(counters.open, 0);
    counters.increment(IssueStatus::Open);
    counters.increment(IssueStatus::Closed);
    counters.increment(IssueStatus::Spam);
    assert_eq!(counters.total(), 2);
    counters.reset(IssueStatus::Open);
    assert_eq!(counters.get(IssueStatus::Open), 0);
    assert_eq!(counters.get(IssueStatus::Closed), 1);
}

#[test]
fn status_round_trips_through_str() {
    for status in [
        IssueStatus::Open,
        IssueStatus::Closed,
        IssueStatus::Verified,
        IssueStatus::Spam,
    ] {
        assert_eq!(status.as_str().parse::<IssueStatus>().unwrap(), status);
    }
    assert!("archived".parse::<IssueStatus>().is_err());
}

#[test]
fn weather_description_skips_missing_fields() {
    let weather = WeatherSummary {
        precipitation_24h_mm: Some(12.0),
        temperature_c_avg: None,
        windspeed_max_ms: Some(4.0),
        weather_note: Some("heavy rain".into()),
        ..Default::default()
    };
    assert_eq!(
        weather.describe(),
        "precipitation_24h=12.0mm, wind_max=4.0m/s, heavy rain"
    );
}
