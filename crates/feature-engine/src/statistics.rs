//! Integration and summary statistics over a smoothed segment

/// Scalar statistics over the smoothed values of one segment.
///
/// All five values are always computed once a segment passes the
/// minimum-sample gate; none of them is optional.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SegmentStats {
    /// Last relative time minus first relative time (0.0 for one sample)
    pub cycle_duration_s: f64,
    /// Simpson integral of current over relative time (ampere-seconds)
    pub area_under_curve: f64,
    /// Arithmetic mean of the smoothed current
    pub mean_current: f64,
    /// Population variance of the smoothed current
    pub variance_current: f64,
    /// Root-mean-square of the smoothed current
    pub rms_current: f64,
}

impl SegmentStats {
    /// Compute all statistics against a relative time axis.
    pub fn compute(times: &[f64], values: &[f64]) -> Self {
        debug_assert_eq!(times.len(), values.len());

        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let cycle_duration_s = if times.len() > 1 {
            times[times.len() - 1] - times[0]
        } else {
            0.0
        };

        let mean_current = values.iter().sum::<f64>() / n;

        let mut m2 = 0.0;
        let mut sq = 0.0;
        for &v in values {
            let d = v - mean_current;
            m2 += d * d;
            sq += v * v;
        }
        let variance_current = m2 / n;
        let rms_current = (sq / n).sqrt();

        Self {
            cycle_duration_s,
            area_under_curve: simpson(values, times),
            mean_current,
            variance_current,
            rms_current,
        }
    }
}

/// Composite Simpson's rule over possibly irregular spacing.
///
/// Quadratic interpolation over consecutive interval pairs. An even sample
/// count leaves one unpaired trailing interval, which is handled by the
/// asymmetric parabola correction over the last three points; exactly two
/// samples degrade to the trapezoid rule.
pub fn simpson(y: &[f64], x: &[f64]) -> f64 {
    debug_assert_eq!(y.len(), x.len());
    let n = y.len();

    if n < 2 {
        return 0.0;
    }
    if n == 2 {
        return 0.5 * (x[1] - x[0]) * (y[0] + y[1]);
    }

    let mut total = 0.0;
    let mut i = 0;
    while i + 2 < n {
        let h0 = x[i + 1] - x[i];
        let h1 = x[i + 2] - x[i + 1];
        let hsum = h0 + h1;
        total += hsum / 6.0
            * (y[i] * (2.0 - h1 / h0)
                + y[i + 1] * (hsum * hsum / (h0 * h1))
                + y[i + 2] * (2.0 - h0 / h1));
        i += 2;
    }

    // Even sample count: one interval remains after pairing.
    if n % 2 == 0 {
        let h1 = x[n - 1] - x[n - 2];
        let h2 = x[n - 2] - x[n - 3];
        let alpha = (2.0 * h1 * h1 + 3.0 * h1 * h2) / (6.0 * (h1 + h2));
        let beta = (h1 * h1 + 3.0 * h1 * h2) / (6.0 * h2);
        let eta = h1 * h1 * h1 / (6.0 * h2 * (h1 + h2));
        total += alpha * y[n - 1] + beta * y[n - 2] - eta * y[n - 3];
    }

    total
}
