// =============================================================================
// Rate of Change (ROC) — Momentum Indicator
// =============================================================================
//
// ROC measures the fractional change in price over a look-back period:
//   ROC = (close - close_n) / close_n
//
// Positive ROC indicates upward momentum; negative indicates downward.
// "Six periods ago" in daily terms is `period = 5`: the sample at `len - 6`.

/// Fractional rate of change between the last value and the one `period`
/// steps earlier.
///
/// Returns `None` when the input is too short. A zero base yields `0.0`.
pub fn current_roc(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() <= period {
        return None;
    }
    let last = closes[closes.len() - 1];
    let prev = closes[closes.len() - 1 - period];
    if prev == 0.0 {
        return Some(0.0);
    }
    Some((last - prev) / prev)
}

/// Absolute change between the last value and the one `period` steps
/// earlier. Used for yields, where a fractional change is not meaningful.
pub fn current_change(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() <= period {
        return None;
    }
    Some(values[values.len() - 1] - values[values.len() - 1 - period])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roc_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        // From 15 to 20: (20 - 15) / 15
        let roc = current_roc(&closes, 5).unwrap();
        assert!((roc - 5.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn roc_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert_eq!(current_roc(&closes, 3), None);
        assert_eq!(current_roc(&closes, 0), None);
    }

    #[test]
    fn roc_zero_base_is_zero() {
        assert_eq!(current_roc(&[0.0, 1.0, 2.0], 2), Some(0.0));
    }

    #[test]
    fn change_uses_absolute_difference() {
        let yields = [4.10, 4.20, 4.15, 4.30, 4.40];
        let change = current_change(&yields, 4).unwrap();
        assert!((change - 0.30).abs() < 1e-12);
        assert_eq!(current_change(&yields, 5), None);
    }
}
