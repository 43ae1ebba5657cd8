/// Log-damped engagement term: `ln(1 + max(count, 0))`.
///
/// Used with a positive weight for upvotes and a negative weight for
/// reports. Defined at zero.
pub fn calculate(count: i64) -> f64 {
    (count.max(0) as f64).ln_1p()
}
