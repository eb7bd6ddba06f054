//! Adaptive-threshold peak detection

/// Peak features of one segment.
///
/// Zero detected peaks is a valid, common outcome (flat cycles); both
/// fields are then absent rather than zero, since a zero would bias the
/// classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PeakSummary {
    /// Highest smoothed value among detected peaks
    pub max_peak: Option<f64>,
    /// Relative timestamp of the first peak in time order
    pub time_to_first_peak: Option<f64>,
}

/// Detect peaks in the smoothed values of a segment.
///
/// The threshold adapts to the segment: the 75th percentile of the smoothed
/// values. A peak is a local maximum at or above that threshold. Never
/// errors.
pub fn detect_peaks(times: &[f64], values: &[f64]) -> PeakSummary {
    debug_assert_eq!(times.len(), values.len());

    if values.is_empty() {
        return PeakSummary::default();
    }

    let threshold = percentile(values, 75.0);
    let peaks: Vec<usize> = local_maxima(values)
        .into_iter()
        .filter(|&i| values[i] >= threshold)
        .collect();

    if peaks.is_empty() {
        return PeakSummary::default();
    }

    let max_peak = peaks
        .iter()
        .map(|&i| values[i])
        .fold(f64::NEG_INFINITY, f64::max);

    PeakSummary {
        max_peak: Some(max_peak),
        time_to_first_peak: Some(times[peaks[0]]),
    }
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(values: &[f64], p: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
    } else {
        sorted[lo]
    }
}

/// Indices of local maxima; a flat-topped peak reports its plateau midpoint.
/// Boundary samples are never maxima.
fn local_maxima(values: &[f64]) -> Vec<usize> {
    let n = values.len();
    let mut maxima = Vec::new();
    if n < 3 {
        return maxima;
    }

    let mut i = 1;
    while i < n - 1 {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < n - 1 && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                maxima.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    maxima
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_peak() {
        let values = vec![0.0, 0.1, 1.0, 0.1, 0.0];
        let times = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let summary = detect_peaks(&times, &values);

        assert_eq!(summary.max_peak, Some(1.0));
        assert_eq!(summary.time_to_first_peak, Some(2.0));
    }

    #[test]
    fn test_flat_signal_has_no_peaks() {
        let values = vec![0.5; 8];
        let times: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let summary = detect_peaks(&times, &values);

        assert_eq!(summary.max_peak, None);
        assert_eq!(summary.time_to_first_peak, None);
    }

    #[test]
    fn test_monotonic_signal_has_no_peaks() {
        let values: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let times = values.clone();
        let summary = detect_peaks(&times, &values);
        assert_eq!(summary.max_peak, None);
    }

    #[test]
    fn test_plateau_midpoint() {
        let values = vec![0.0, 1.0, 1.0, 0.0];
        assert_eq!(local_maxima(&values), vec![1]);

        let values = vec![0.0, 1.0, 1.0, 1.0, 0.0];
        assert_eq!(local_maxima(&values), vec![2]);
    }

    #[test]
    fn test_below_threshold_maximum_is_ignored() {
        // The small bump is a local maximum but sits below the 75th
        // percentile of the whole segment.
        let values = vec![0.0, 0.2, 0.0, 5.0, 6.0, 5.0, 4.0, 3.0];
        let times: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let summary = detect_peaks(&times, &values);

        assert_eq!(summary.max_peak, Some(6.0));
        assert_eq!(summary.time_to_first_peak, Some(4.0));
    }

    #[test]
    fn test_first_peak_is_earliest_in_time() {
        let values = vec![0.0, 5.0, 0.0, 6.0, 0.0];
        let times = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let summary = detect_peaks(&times, &values);

        assert_eq!(summary.max_peak, Some(6.0));
        assert_eq!(summary.time_to_first_peak, Some(1.0));
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        assert!((percentile(&[1.0, 2.0, 3.0, 4.0], 75.0) - 3.25).abs() < 1e-12);
        assert_eq!(percentile(&[2.0], 75.0), 2.0);
        assert_eq!(percentile(&[1.0, 2.0, 3.0], 100.0), 3.0);
    }

    #[test]
    fn test_short_segments_never_error() {
        assert_eq!(detect_peaks(&[], &[]), PeakSummary::default());
        assert_eq!(detect_peaks(&[0.0], &[1.0]), PeakSummary::default());
        assert_eq!(detect_peaks(&[0.0, 1.0], &[1.0, 2.0]), PeakSummary::default());
    }
}
