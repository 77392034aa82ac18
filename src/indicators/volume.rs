// =============================================================================
// Volume Ratio
// =============================================================================
//
//   ratio = latest_volume / SMA(volume, period)
//
// The rolling average includes the latest bar.

use super::sma::last_sma;

/// Latest volume divided by its trailing `period` average.
///
/// Returns `None` when the window does not fit or the average is not
/// strictly positive (a zero-volume feed carries no information). A gap in
/// the window yields `Some(NaN)`.
pub fn volume_ratio(volumes: &[f64], period: usize) -> Option<f64> {
    let avg = last_sma(volumes, period)?;
    let latest = *volumes.last()?;
    if avg <= 0.0 {
        return None;
    }
    Some(latest / avg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_volume_is_unity() {
        let v = vec![500.0; 25];
        assert_eq!(volume_ratio(&v, 20), Some(1.0));
    }

    #[test]
    fn spike_above_average() {
        let mut v = vec![100.0; 19];
        v.push(300.0);
        // avg = (19 * 100 + 300) / 20 = 110
        let r = volume_ratio(&v, 20).unwrap();
        assert!((r - 300.0 / 110.0).abs() < 1e-12);
    }

    #[test]
    fn zero_average_is_none() {
        assert_eq!(volume_ratio(&[0.0; 20], 20), None);
    }

    #[test]
    fn gap_in_window_is_nan() {
        let mut v = vec![100.0; 20];
        v[3] = f64::NAN;
        assert!(volume_ratio(&v, 20).unwrap().is_nan());
    }

    #[test]
    fn short_input_is_none() {
        assert_eq!(volume_ratio(&[1.0; 5], 20), None);
    }
}
