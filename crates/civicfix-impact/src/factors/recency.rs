use chrono::{DateTime, Utc};

/// Age in fractional days, floored at 0 when `created_at` is in the future.
pub fn age_days(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_seconds().max(0) as f64 / 86400.0
}

/// Recency factor: `e^(-age_days / tau_days)`.
///
/// Range: 0.0 – 1.0. A brand-new issue scores 1.0, one `tau` old ≈ 0.37.
pub fn calculate(created_at: DateTime<Utc>, now: DateTime<Utc>, tau_days: f64) -> f64 {
    if !tau_days.is_finite() || tau_days <= 0.0 {
        return 0.0;
    }
    (-age_days(created_at, now) / tau_days).exp()
}
