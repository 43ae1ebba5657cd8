/// Density factor: the caller's normalized density clamped to [0, 1].
/// Missing or NaN density counts as 0.
pub fn calculate(density_norm: f64) -> f64 {
    if density_norm.is_nan() {
        return 0.0;
    }
    density_norm.clamp(0.0, 1.0)
}
