/// Computes `sum / n`. Returns `None` for `n == 0` so callers never see NaN.
pub fn checked_mean(sum: u64, n: usize) -> Option<f64> {
    if n == 0 {
        return None;
    }
    Some(sum as f64 / n as f64)
}

/// Rounds to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percentage of `part` in `total`. Returns 0.0 when `total` is zero.
pub fn pct(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
