//! Feature Vector Assembly

use crate::peaks::detect_peaks;
use crate::schema::FeatureSchema;
use crate::smoothing::{repair_missing, smooth};
use crate::statistics::SegmentStats;
use sample_stream::Segment;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Canonical feature column names, in output order. This is the contract
/// shared by the training table and the live prediction path.
pub const FIELD_NAMES: [&str; 8] = [
    "samples",
    "cycle_duration_s",
    "area_under_curve",
    "mean_current",
    "variance_current",
    "rms_current",
    "max_peak",
    "time_to_first_peak",
];

/// Minimum samples per segment in the batch path
pub const MIN_SAMPLES_BATCH: usize = 3;

/// Minimum samples per segment in the streaming path
pub const MIN_SAMPLES_STREAMING: usize = 10;

/// Fixed-order numeric summary of one brew cycle.
///
/// Immutable once built. The two peak fields are absent, not zero, when the
/// segment has no detected peak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Number of raw samples in the segment
    pub samples: usize,
    /// Segment duration in seconds
    pub cycle_duration_s: f64,
    /// Simpson integral of smoothed current over time (ampere-seconds)
    pub area_under_curve: f64,
    /// Mean smoothed current
    pub mean_current: f64,
    /// Population variance of smoothed current
    pub variance_current: f64,
    /// RMS of smoothed current
    pub rms_current: f64,
    /// Highest detected peak, if any
    pub max_peak: Option<f64>,
    /// Relative time of the first detected peak, if any
    pub time_to_first_peak: Option<f64>,
}

impl FeatureVector {
    /// Look up a feature by column name. `samples` is reported as f64 so a
    /// row is a homogeneous numeric record; the peak fields yield `None`
    /// when absent.
    pub fn value(&self, field: &str) -> Option<f64> {
        match field {
            "samples" => Some(self.samples as f64),
            "cycle_duration_s" => Some(self.cycle_duration_s),
            "area_under_curve" => Some(self.area_under_curve),
            "mean_current" => Some(self.mean_current),
            "variance_current" => Some(self.variance_current),
            "rms_current" => Some(self.rms_current),
            "max_peak" => self.max_peak,
            "time_to_first_peak" => self.time_to_first_peak,
            _ => None,
        }
    }

    /// Emit the vector as a row in schema order.
    ///
    /// A schema field the vector carries no value for is injected as `None`
    /// rather than being reordered or dropped; column identity and order are
    /// guaranteed to match the schema exactly.
    pub fn to_row(&self, schema: &FeatureSchema) -> Vec<Option<f64>> {
        schema.fields().iter().map(|f| self.value(f)).collect()
    }
}

/// Builds feature vectors from segments, applying the minimum-sample gate.
#[derive(Debug, Clone)]
pub struct FeatureVectorBuilder {
    min_samples: usize,
}

impl FeatureVectorBuilder {
    /// Create a builder with the given minimum segment size
    pub fn new(min_samples: usize) -> Self {
        Self { min_samples }
    }

    /// Builder for the batch labeling path (minimum 3 samples)
    pub fn batch() -> Self {
        Self::new(MIN_SAMPLES_BATCH)
    }

    /// Builder for the streaming prediction path (minimum 10 samples)
    pub fn streaming() -> Self {
        Self::new(MIN_SAMPLES_STREAMING)
    }

    /// Minimum segment size this builder accepts
    pub fn min_samples(&self) -> usize {
        self.min_samples
    }

    /// Extract the feature vector of one segment.
    ///
    /// Returns `None` for segments below the minimum-sample gate and for
    /// segments with no usable current reading at all; those are discarded
    /// with no feature row and no classification attempt.
    pub fn build(&self, segment: &Segment) -> Option<FeatureVector> {
        let n = segment.len();
        if n < self.min_samples {
            debug!(
                "segment {} skipped: {} samples < minimum {}",
                segment.id(),
                n,
                self.min_samples
            );
            return None;
        }

        let currents = segment.currents();
        if currents.iter().all(|c| !c.is_finite()) {
            debug!("segment {} skipped: no usable current values", segment.id());
            return None;
        }

        let times = segment.relative_times();
        let repaired = repair_missing(&currents);
        let smoothed = smooth(&repaired);
        if smoothed.used_fallback {
            debug!(
                "segment {}: smoothing fell back to raw values",
                segment.id()
            );
        }

        let stats = SegmentStats::compute(&times, &smoothed.values);
        let peaks = detect_peaks(&times, &smoothed.values);

        Some(FeatureVector {
            samples: n,
            cycle_duration_s: stats.cycle_duration_s,
            area_under_curve: stats.area_under_curve,
            mean_current: stats.mean_current,
            variance_current: stats.variance_current,
            rms_current: stats.rms_current,
            max_peak: peaks.max_peak,
            time_to_first_peak: peaks.time_to_first_peak,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sample_stream::Sample;

    fn segment(points: &[(f64, f64)]) -> Segment {
        Segment::new(
            0,
            points
                .iter()
                .map(|&(ts, current)| Sample::new(ts, current).unwrap())
                .collect(),
        )
    }

    fn brew_cycle(n: usize) -> Segment {
        // Roughly bell-shaped draw sampled at 1 Hz
        let points: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let x = i as f64 / (n - 1) as f64;
                (i as f64, 0.1 + 2.0 * (std::f64::consts::PI * x).sin())
            })
            .collect();
        segment(&points)
    }

    #[test]
    fn test_samples_field_equals_segment_length() {
        for n in [3usize, 10, 37] {
            let vector = FeatureVectorBuilder::new(3).build(&brew_cycle(n)).unwrap();
            assert_eq!(vector.samples, n);
        }
    }

    #[test]
    fn test_minimum_sample_gate() {
        let builder = FeatureVectorBuilder::streaming();
        assert!(builder.build(&brew_cycle(9)).is_none());
        assert!(builder.build(&brew_cycle(10)).is_some());

        let builder = FeatureVectorBuilder::batch();
        assert!(builder.build(&segment(&[(0.0, 0.1), (1.0, 0.2)])).is_none());
    }

    #[test]
    fn test_all_missing_segment_discarded() {
        let builder = FeatureVectorBuilder::batch();
        let seg = segment(&[(0.0, f64::NAN), (1.0, f64::NAN), (2.0, f64::NAN)]);
        assert!(builder.build(&seg).is_none());
    }

    #[test]
    fn test_missing_values_repaired_not_discarded() {
        let builder = FeatureVectorBuilder::batch();
        let seg = segment(&[(0.0, 0.1), (1.0, f64::NAN), (2.0, f64::NAN), (3.0, 0.4)]);
        let vector = builder.build(&seg).unwrap();
        assert!(vector.mean_current.is_finite());
        assert!(vector.area_under_curve.is_finite());
    }

    #[test]
    fn test_peak_fields_present_for_peaked_cycle() {
        let vector = FeatureVectorBuilder::batch().build(&brew_cycle(21)).unwrap();
        assert!(vector.max_peak.is_some());
        let t_peak = vector.time_to_first_peak.unwrap();
        assert!(t_peak >= 0.0);
        assert!(t_peak <= vector.cycle_duration_s);
    }

    #[test]
    fn test_peak_fields_absent_for_flat_cycle() {
        let seg = segment(&[(0.0, 0.5), (1.0, 0.5), (2.0, 0.5), (3.0, 0.5)]);
        let vector = FeatureVectorBuilder::batch().build(&seg).unwrap();
        assert_eq!(vector.max_peak, None);
        assert_eq!(vector.time_to_first_peak, None);
    }

    #[test]
    fn test_row_follows_schema_order() {
        let vector = FeatureVectorBuilder::batch().build(&brew_cycle(11)).unwrap();
        let schema = FeatureSchema::canonical();
        let row = vector.to_row(&schema);

        assert_eq!(row.len(), FIELD_NAMES.len());
        assert_eq!(row[0], Some(11.0));
        assert_eq!(row[1], Some(vector.cycle_duration_s));
        assert_eq!(row[6], vector.max_peak);
        assert_eq!(row[7], vector.time_to_first_peak);
    }

    #[test]
    fn test_absent_peaks_injected_as_none_in_row() {
        let seg = segment(&[(0.0, 0.5), (1.0, 0.5), (2.0, 0.5)]);
        let vector = FeatureVectorBuilder::batch().build(&seg).unwrap();
        let row = vector.to_row(&FeatureSchema::canonical());
        assert_eq!(row[6], None);
        assert_eq!(row[7], None);
    }

    proptest! {
        #[test]
        fn prop_extraction_is_deterministic(
            currents in proptest::collection::vec(0.0f64..5.0, 10..60),
        ) {
            let points: Vec<(f64, f64)> = currents
                .iter()
                .enumerate()
                .map(|(i, &c)| (i as f64 * 0.5, c))
                .collect();
            let seg = segment(&points);
            let builder = FeatureVectorBuilder::streaming();

            let a = builder.build(&seg).unwrap();
            let b = builder.build(&seg).unwrap();

            // bit-for-bit identical
            prop_assert_eq!(a.area_under_curve.to_bits(), b.area_under_curve.to_bits());
            prop_assert_eq!(a.mean_current.to_bits(), b.mean_current.to_bits());
            prop_assert_eq!(a.variance_current.to_bits(), b.variance_current.to_bits());
            prop_assert_eq!(a.rms_current.to_bits(), b.rms_current.to_bits());
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_duration_is_non_negative(
            deltas in proptest::collection::vec(0.0f64..3.0, 9..40),
        ) {
            let mut ts = 0.0;
            let mut points = vec![(ts, 0.2)];
            for d in deltas {
                ts += d;
                points.push((ts, 0.2));
            }
            let seg = segment(&points);
            let vector = FeatureVectorBuilder::streaming().build(&seg).unwrap();
            prop_assert!(vector.cycle_duration_s >= 0.0);
        }
    }
}
