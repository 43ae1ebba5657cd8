use chrono::{DateTime, Utc};

use civicfix_core::config::ScoringConfig;
use civicfix_core::models::ImpactAssessment;

use crate::factors::{self, ImpactContext, ImpactInputs};

/// Weighted-sum impact formula.
///
/// ```text
/// raw    = w_s·severity + w_u·ln(1+upvotes) − w_r·ln(1+reports)
///        + w_d·density + w_t·recency
/// impact = clamp(raw · 100 / normalizer, 0, 100)
/// ```
///
/// Result is clamped to [0.0, 100.0].
pub fn compute(inputs: &ImpactInputs, ctx: &ImpactContext, weights: &ScoringConfig) -> ImpactAssessment {
    let breakdown = compute_breakdown(inputs, ctx, weights);
    ImpactAssessment {
        impact_score: breakdown.impact_score,
        visibility_radius_m: breakdown.visibility_radius_m,
    }
}

/// Each factor of the formula, for debugging and observability.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactBreakdown {
    pub severity: f64,
    pub upvotes: f64,
    pub reports: f64,
    pub density: f64,
    pub recency: f64,
    pub age_days: f64,
    pub raw: f64,
    pub impact_score: f64,
    pub visibility_radius_m: u32,
}

/// Compute impact with a full breakdown of each factor.
pub fn compute_breakdown(
    inputs: &ImpactInputs,
    ctx: &ImpactContext,
    weights: &ScoringConfig,
) -> ImpactBreakdown {
    let severity = factors::severity::calculate(inputs.severity_score);
    let upvotes = factors::engagement::calculate(inputs.upvotes_total);
    let reports = factors::engagement::calculate(inputs.reports_total);
    let density = factors::density::calculate(inputs.density_norm);
    let recency = factors::recency::calculate(inputs.created_at, ctx.now, weights.recency_tau_days);

    let raw = weights.w_severity * severity + weights.w_upvotes * upvotes
        - weights.w_reports * reports
        + weights.w_density * density
        + weights.w_recency * recency;

    let impact_score = normalize(raw, weights.normalizer);

    ImpactBreakdown {
        severity,
        upvotes,
        reports,
        density,
        recency,
        age_days: factors::recency::age_days(inputs.created_at, ctx.now),
        raw,
        impact_score,
        visibility_radius_m: visibility_radius(impact_score, weights),
    }
}

fn normalize(raw: f64, normalizer: f64) -> f64 {
    if !raw.is_finite() || !normalizer.is_finite() || normalizer <= 0.0 {
        return 0.0;
    }
    (raw * 100.0 / normalizer).clamp(0.0, 100.0)
}

/// `round(base · (1 + growth · ln(1 + impact)))`, never below `base`.
pub fn visibility_radius(impact_score: f64, weights: &ScoringConfig) -> u32 {
    let impact = if impact_score.is_nan() {
        0.0
    } else {
        impact_score.clamp(0.0, 100.0)
    };
    let growth = weights.radius_growth.max(0.0);
    let radius = weights.radius_base_m * (1.0 + growth * impact.ln_1p());
    // `as` saturates, so a pathological base cannot wrap.
    radius.round() as u32
}

/// Score with the default weights. Returns `(impact_score, visibility_radius_m)`.
pub fn compute_impact(
    severity_score: f64,
    upvotes_total: i64,
    reports_total: i64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    density_norm: f64,
) -> (f64, u32) {
    let inputs = ImpactInputs {
        severity_score,
        upvotes_total,
        reports_total,
        created_at,
        density_norm,
    };
    let assessment = compute(&inputs, &ImpactContext::at(now), &ScoringConfig::default());
    (assessment.impact_score, assessment.visibility_radius_m)
}
