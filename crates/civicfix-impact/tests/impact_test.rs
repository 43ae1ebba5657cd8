use chrono::{Duration, TimeZone, Utc};

use civicfix_core::config::ScoringConfig;
use civicfix_core::models::{GeoPoint, Issue, IssueStatus, StatusCounters};
use civicfix_impact::{compute_impact, ImpactContext, ImpactEngine, ImpactInputs};

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

fn inputs(severity: f64, up: i64, rep: i64, age_days: i64) -> ImpactInputs {
    ImpactInputs {
        severity_score: severity,
        upvotes_total: up,
        reports_total: rep,
        created_at: now() - Duration::days(age_days),
        density_norm: 0.0,
    }
}

// ── end-to-end scenarios ──

#[test]
fn max_severity_brand_new_issue_scores_100_with_128m_radius() {
    let (impact, radius) = compute_impact(10.0, 0, 0, now(), now(), 0.0);
    assert!((impact - 100.0).abs() < 1e-9, "got {impact}");
    assert_eq!(radius, 128);
}

#[test]
fn severity_eight_brand_new_issue() {
    // raw = 40·0.8 + 25 = 57 → 57·100/65 ≈ 87.69
    let (impact, radius) = compute_impact(8.0, 0, 0, now(), now(), 0.0);
    assert!((impact - 87.6923).abs() < 1e-3, "got {impact}");
    assert_eq!(radius, 127);
}

#[test]
fn fourteen_day_old_issue_keeps_about_37_percent_of_recency() {
    let engine = ImpactEngine::new();
    let breakdown = engine.breakdown(&inputs(0.0, 0, 0, 14), &ImpactContext::at(now()));
    assert!((breakdown.recency - (-1.0f64).exp()).abs() < 1e-9);
    assert!((breakdown.age_days - 14.0).abs() < 1e-9);
    assert!((breakdown.impact_score - 25.0 * (-1.0f64).exp() * 100.0 / 65.0).abs() < 1e-9);
}

#[test]
fn zero_everything_and_ancient_floors_at_base_radius() {
    let (impact, radius) = compute_impact(0.0, 0, 0, now() - Duration::days(3650), now(), 0.0);
    assert!(impact < 1e-6);
    assert_eq!(radius, 100);
}

// ── sanitization ──

#[test]
fn out_of_range_inputs_are_clamped_not_rejected() {
    let clamped = compute_impact(10.0, 0, 0, now(), now(), 0.0);
    assert_eq!(compute_impact(25.0, 0, 0, now(), now(), 0.0), clamped);
    assert_eq!(
        compute_impact(-3.0, -5, -7, now(), now(), -1.0),
        compute_impact(0.0, 0, 0, now(), now(), 0.0)
    );
    assert_eq!(
        compute_impact(f64::NAN, 0, 0, now(), now(), f64::NAN),
        compute_impact(0.0, 0, 0, now(), now(), 0.0)
    );
}

#[test]
fn future_created_at_counts_as_brand_new() {
    let skewed = compute_impact(6.0, 2, 0, now() + Duration::hours(3), now(), 0.0);
    let fresh = compute_impact(6.0, 2, 0, now(), now(), 0.0);
    assert_eq!(skewed, fresh);
}

#[test]
fn heavy_reporting_drives_score_to_zero() {
    let (impact, radius) = compute_impact(0.0, 0, 100, now(), now(), 0.0);
    assert_eq!(impact, 0.0);
    assert_eq!(radius, 100);
}

#[test]
fn density_contributes_up_to_its_weight() {
    let engine = ImpactEngine::new();
    let ctx = ImpactContext::at(now());
    let mut dense = inputs(2.0, 0, 0, 0);
    dense.density_norm = 1.0;
    let sparse = inputs(2.0, 0, 0, 0);
    let delta = engine.breakdown(&dense, &ctx).raw - engine.breakdown(&sparse, &ctx).raw;
    assert!((delta - 15.0).abs() < 1e-9);
}

// ── configurable weights ──

#[test]
fn custom_weights_change_the_score() {
    let weights = ScoringConfig {
        w_recency: 0.0,
        ..ScoringConfig::default()
    };
    let engine = ImpactEngine::with_weights(weights);
    let assessment = engine.assess(&inputs(10.0, 0, 0, 0), &ImpactContext::at(now()));
    assert!((assessment.impact_score - 40.0 * 100.0 / 65.0).abs() < 1e-9);
}

#[test]
fn issue_counters_are_summed_across_buckets() {
    let issue = Issue {
        issue_id: "issue-1".into(),
        reported_by: None,
        location: GeoPoint { lat: 18.52, lon: 73.85 },
        created_at: now(),
        updated_at: now(),
        status: IssueStatus::Closed,
        closed_by: None,
        closed_at: None,
        photo_url: None,
        description: String::new(),
        auto_caption: String::new(),
        user_selected_labels: vec![],
        detected_issues: vec![],
        issue_types: vec![],
        severity_score: 5.0,
        fate_risk_co2: 0.0,
        upvotes: StatusCounters { open: 3, closed: 2, verified: 1 },
        reports: StatusCounters { open: 1, closed: 0, verified: 0 },
        impact_score: 0.0,
        visibility_radius_m: 100,
        weather: None,
        evidence_ids: vec![],
        text_embedding: None,
    };
    let engine = ImpactEngine::new();
    let ctx = ImpactContext::at(now());
    let from_issue = engine.assess_issue(&issue, 0.0, &ctx);
    let direct = engine.assess(&inputs(5.0, 6, 1, 0), &ctx);
    assert_eq!(from_issue, direct);
    assert_eq!(engine.assess_batch(&[issue], &ctx), vec![direct]);
}
