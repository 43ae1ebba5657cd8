/// Severity factor: `clamp(severity, 0, 10) / 10`.
///
/// Range: 0.0 – 1.0. NaN counts as 0.
pub fn calculate(severity_score: f64) -> f64 {
    if severity_score.is_nan() {
        return 0.0;
    }
    severity_score.clamp(0.0, 10.0) / 10.0
}
