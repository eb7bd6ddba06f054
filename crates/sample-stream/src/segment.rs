//! Brew-cycle segment type

use crate::Sample;

/// A contiguous run of samples judged to belong to one brew cycle.
///
/// Created by a segmenter when a boundary condition fires, consumed once by
/// the extraction pipeline, never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    id: u64,
    samples: Vec<Sample>,
}

impl Segment {
    /// Build a segment from samples in arrival order
    pub fn new(id: u64, samples: Vec<Sample>) -> Self {
        Self { id, samples }
    }

    /// Segment id, monotonically increasing per segmenter run
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Samples in time order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the segment holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Current values in time order
    pub fn currents(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.current).collect()
    }

    /// Time axis rebased to the earliest timestamp in the segment
    pub fn relative_times(&self) -> Vec<f64> {
        let t0 = self
            .samples
            .iter()
            .map(|s| s.ts)
            .fold(f64::INFINITY, f64::min);
        self.samples.iter().map(|s| s.ts - t0).collect()
    }
}
