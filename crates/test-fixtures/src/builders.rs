//! Document builders. Every field gets a plausible default; tests override
//! what they care about with struct update syntax or the `with_*` helpers.

use chrono::{DateTime, Duration, TimeZone, Utc};

use civicfix_core::models::{
    DetectedIssueLabel, FixOutcome, FixRecord, FixedState, GeoPoint, Issue, IssueStatus,
    StatusCounters,
};

/// Fixed reference instant so tests do not depend on the wall clock.
pub fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Connaught Place, New Delhi.
pub fn city_center() -> GeoPoint {
    GeoPoint {
        lat: 28.6315,
        lon: 77.2167,
    }
}

/// A point `meters` due north of `origin`.
pub fn north_of(origin: GeoPoint, meters: f64) -> GeoPoint {
    GeoPoint {
        lat: origin.lat + meters / 111_195.0,
        lon: origin.lon,
    }
}

pub fn label(label_type: &str, confidence: f64, severity: f64) -> DetectedIssueLabel {
    DetectedIssueLabel {
        label_type: label_type.to_string(),
        confidence,
        severity_score: severity,
        future_impact: format!("{label_type} will worsen if left alone"),
        predicted_fix: format!("Repair {label_type}"),
        predicted_fix_confidence: 0.7,
        auto_review_flag: confidence < 0.85,
    }
}

/// An open issue at `location`, created at `created_at`, carrying one
/// label per `(type, severity)` pair.
pub fn issue_at(
    issue_id: &str,
    location: GeoPoint,
    created_at: DateTime<Utc>,
    labels: &[(&str, f64)],
) -> Issue {
    let detected: Vec<DetectedIssueLabel> = labels
        .iter()
        .map(|(t, severity)| label(t, 0.9, *severity))
        .collect();
    let severity_score = detected
        .iter()
        .map(|l| l.severity_score)
        .fold(0.0, f64::max);
    Issue {
        issue_id: issue_id.to_string(),
        reported_by: Some("citizen-1".into()),
        location,
        created_at,
        updated_at: created_at,
        status: IssueStatus::Open,
        closed_by: None,
        closed_at: None,
        photo_url: Some(format!("https://storage.example/issues/{issue_id}.jpg")),
        description: format!("Reported problem {issue_id}"),
        auto_caption: "Street scene".into(),
        user_selected_labels: vec![],
        issue_types: detected.iter().map(|l| l.label_type.clone()).collect(),
        detected_issues: detected,
        severity_score,
        fate_risk_co2: 25.0,
        upvotes: StatusCounters::default(),
        reports: StatusCounters::default(),
        impact_score: 50.0,
        visibility_radius_m: 124,
        weather: None,
        evidence_ids: vec![],
        text_embedding: None,
    }
}

/// A single-label open issue at the city center, created at
/// [`reference_now`].
pub fn sample_issue(issue_id: &str) -> Issue {
    issue_at(
        issue_id,
        city_center(),
        reference_now(),
        &[("waterlogging", 7.0)],
    )
}

/// Issue created `days` before the wall clock, for code paths that
/// compute lookback windows from `Utc::now()`.
pub fn aged_issue(issue_id: &str, location: GeoPoint, days: i64, labels: &[(&str, f64)]) -> Issue {
    issue_at(issue_id, location, Utc::now() - Duration::days(days), labels)
}

pub fn with_embedding(mut issue: Issue, vector: Vec<f32>) -> Issue {
    issue.text_embedding = Some(vector);
    issue
}

/// Fix record for `issue_id` that marks every type as fixed.
pub fn fix_record(fix_id: &str, issue_id: &str, types: &[&str]) -> FixRecord {
    FixRecord {
        fix_id: fix_id.to_string(),
        issue_id: issue_id.to_string(),
        created_by: "ngo-1".into(),
        created_at: reference_now(),
        title: format!("Fixed {}", types.join(", ")),
        summary: "Crew cleared the site and restored the surface.".into(),
        image_urls: vec![format!("https://storage.example/fixes/{fix_id}.jpg")],
        photo_count: 1,
        co2_saved: 25.0,
        success_rate: 0.9,
        related_issue_types: types.iter().map(|t| t.to_string()).collect(),
        fix_outcomes: types
            .iter()
            .map(|t| FixOutcome {
                issue_type: t.to_string(),
                fixed: FixedState::Yes,
                confidence: 0.9,
                notes: String::new(),
            })
            .collect(),
        text_embedding: None,
        source_doc_ids: vec![],
    }
}

/// Unit vector along axis `axis` in `dims` dimensions.
pub fn axis_vector(dims: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    if dims > 0 {
        v[axis % dims] = 1.0;
    }
    v
}

/// Normalized blend of two axes: `weight` on `a`, the rest on `b`.
pub fn blend_vector(dims: usize, a: usize, b: usize, weight: f32) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    v[a % dims] += weight;
    v[b % dims] += 1.0 - weight;
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    v.iter().map(|x| x / norm).collect()
}
