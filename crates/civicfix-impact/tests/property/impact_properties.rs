use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use civicfix_impact::{ImpactContext, ImpactEngine, ImpactInputs};

fn inputs(severity: f64, up: i64, rep: i64, age_hours: i64, density: f64) -> ImpactInputs {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    ImpactInputs {
        severity_score: severity,
        upvotes_total: up,
        reports_total: rep,
        created_at: now - Duration::hours(age_hours),
        density_norm: density,
    }
}

fn ctx() -> ImpactContext {
    ImpactContext::at(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
}

proptest! {
    #[test]
    fn impact_is_bounded(
        severity in -20.0f64..30.0,
        up in -100i64..100_000,
        rep in -100i64..100_000,
        age in -500i64..100_000,
        density in -1.0f64..2.0,
    ) {
        let a = ImpactEngine::new().assess(&inputs(severity, up, rep, age, density), &ctx());
        prop_assert!((0.0..=100.0).contains(&a.impact_score));
        prop_assert!(a.visibility_radius_m >= 100);
    }

    #[test]
    fn non_decreasing_in_severity(
        s1 in 0.0f64..10.0, s2 in 0.0f64..10.0,
        up in 0i64..500, rep in 0i64..500, age in 0i64..5000,
    ) {
        let (lo, hi) = if s1 <= s2 { (s1, s2) } else { (s2, s1) };
        let engine = ImpactEngine::new();
        let a = engine.assess(&inputs(lo, up, rep, age, 0.0), &ctx());
        let b = engine.assess(&inputs(hi, up, rep, age, 0.0), &ctx());
        prop_assert!(a.impact_score <= b.impact_score);
        prop_assert!(a.visibility_radius_m <= b.visibility_radius_m);
    }

    #[test]
    fn non_decreasing_in_upvotes(
        severity in 0.0f64..10.0, u1 in 0i64..10_000, u2 in 0i64..10_000,
        rep in 0i64..500, age in 0i64..5000,
    ) {
        let (lo, hi) = if u1 <= u2 { (u1, u2) } else { (u2, u1) };
        let engine = ImpactEngine::new();
        let a = engine.assess(&inputs(severity, lo, rep, age, 0.0), &ctx());
        let b = engine.assess(&inputs(severity, hi, rep, age, 0.0), &ctx());
        prop_assert!(a.impact_score <= b.impact_score);
    }

    #[test]
    fn non_increasing_in_reports(
        severity in 0.0f64..10.0, up in 0i64..500,
        r1 in 0i64..10_000, r2 in 0i64..10_000, age in 0i64..5000,
    ) {
        let (lo, hi) = if r1 <= r2 { (r1, r2) } else { (r2, r1) };
        let engine = ImpactEngine::new();
        let a = engine.assess(&inputs(severity, up, lo, age, 0.0), &ctx());
        let b = engine.assess(&inputs(severity, up, hi, age, 0.0), &ctx());
        prop_assert!(a.impact_score >= b.impact_score);
    }

    #[test]
    fn strictly_decays_with_age_when_unclamped(
        severity in 0.0f64..5.0,
        age_days in 0i64..100,
        extra_days in 1i64..30,
    ) {
        // Severity ≤ 5 with no engagement keeps raw inside (0, 65).
        let engine = ImpactEngine::new();
        let young = engine.assess(&inputs(severity, 0, 0, age_days * 24, 0.0), &ctx());
        let old = engine.assess(&inputs(severity, 0, 0, (age_days + extra_days) * 24, 0.0), &ctx());
        prop_assert!(old.impact_score < young.impact_score);
    }

    #[test]
    fn scoring_is_pure(
        severity in 0.0f64..10.0, up in 0i64..1000, rep in 0i64..1000,
        age in 0i64..5000, density in 0.0f64..1.0,
    ) {
        let engine = ImpactEngine::new();
        let i = inputs(severity, up, rep, age, density);
        prop_assert_eq!(engine.assess(&i, &ctx()), engine.assess(&i, &ctx()));
    }
}
