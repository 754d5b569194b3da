/// Convert a page position into a reading percentage.
///
/// `100 * current_page / total_pages` when `total_pages` is positive, `0`
/// otherwise. The result is intentionally not clamped: callers may pass a
/// current page beyond the total (or negative values) and get an out-of-range
/// percentage back. Whether that permissiveness is intended is an open
/// product question, so the behavior is preserved rather than corrected.
#[must_use]
#[inline]
#[allow(clippy::cast_precision_loss, reason = "Page counts are far below 2^52")]
pub fn compute(current_page: i64, total_pages: i64) -> f64 {
    if total_pages > 0 {
        current_page as f64 * 100.0 / total_pages as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn halfway_is_fifty_percent() {
        assert_eq!(compute(50, 100), 50.0);
    }

    #[test]
    fn zero_total_pages_yields_zero() {
        assert_eq!(compute(10, 0), 0.0);
        assert_eq!(compute(10, -1), 0.0);
    }

    #[test]
    fn progress_is_not_clamped() {
        assert_eq!(compute(150, 100), 150.0);
        assert_eq!(compute(-10, 100), -10.0);
    }
}
