// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
//   SMA_t = (close_t + close_{t-1} + ... + close_{t-period+1}) / period
//
// Only the trailing value is needed by the model.
// =============================================================================

/// Mean of the last `period` values.
///
/// NaN inside the window propagates into the result. A constant window
/// returns its value exactly, so a flat series gives equal averages for
/// every period.
pub fn last_sma(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    let tail = &values[values.len() - period..];
    let first = tail[0];
    if tail.iter().all(|&v| v == first) {
        return Some(first);
    }
    Some(tail.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_and_zero_period() {
        assert_eq!(last_sma(&[], 5), None);
        assert_eq!(last_sma(&[1.0, 2.0], 0), None);
    }

    #[test]
    fn sma_insufficient_data() {
        assert_eq!(last_sma(&[1.0, 2.0], 5), None);
    }

    #[test]
    fn sma_known_values() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_eq!(last_sma(&values, 5), Some(8.0));
        assert_eq!(last_sma(&values[..5], 5), Some(3.0));
    }

    #[test]
    fn last_sma_uses_trailing_window() {
        let values = [100.0, 100.0, 1.0, 2.0, 3.0];
        assert_eq!(last_sma(&values, 3), Some(2.0));
    }

    #[test]
    fn constant_window_is_exact_for_any_period() {
        let values = vec![4.2; 40];
        let short = last_sma(&values, 5).unwrap();
        let long = last_sma(&values, 20).unwrap();
        assert_eq!(short, 4.2);
        assert_eq!(short - long, 0.0);
    }

    #[test]
    fn nan_in_window_propagates() {
        let values = [1.0, f64::NAN, 3.0, 4.0];
        assert!(last_sma(&values, 3).unwrap().is_nan());
        // Window that skips the gap stays finite.
        assert_eq!(last_sma(&values, 2), Some(3.5));
    }
}
