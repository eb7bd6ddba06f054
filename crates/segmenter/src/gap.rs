//! Gap-based segmentation for batch runs

use sample_stream::{Sample, Segment};

/// Default inactivity gap that separates two products (seconds)
pub const DEFAULT_BOUNDARY_THRESHOLD_S: f64 = 5.0;

/// Splits a time-sorted sample log on timestamp gaps.
///
/// A new segment starts whenever the delta between consecutive timestamps is
/// strictly greater than the boundary threshold; a delta exactly at the
/// threshold does not split. Ids count groups over the whole input, so a
/// segment later discarded by the minimum-sample gate still consumes its id.
#[derive(Debug, Clone)]
pub struct GapBasedSegmenter {
    boundary_threshold_s: f64,
}

impl GapBasedSegmenter {
    /// Create a segmenter with the given gap threshold (seconds)
    pub fn new(boundary_threshold_s: f64) -> Self {
        Self {
            boundary_threshold_s,
        }
    }

    /// Lazily iterate segments over a time-sorted slice.
    ///
    /// Not incremental: restarting means re-running over the full input.
    pub fn segments<'a>(&self, samples: &'a [Sample]) -> GapSegments<'a> {
        GapSegments {
            samples,
            pos: 0,
            next_id: 0,
            boundary_threshold_s: self.boundary_threshold_s,
        }
    }
}

impl Default for GapBasedSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY_THRESHOLD_S)
    }
}

/// Iterator over gap-delimited segments
pub struct GapSegments<'a> {
    samples: &'a [Sample],
    pos: usize,
    next_id: u64,
    boundary_threshold_s: f64,
}

impl Iterator for GapSegments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if self.pos >= self.samples.len() {
            return None;
        }

        let start = self.pos;
        let mut end = start;
        while end + 1 < self.samples.len()
            && self.samples[end + 1].ts - self.samples[end].ts <= self.boundary_threshold_s
        {
            end += 1;
        }

        let segment = Segment::new(self.next_id, self.samples[start..=end].to_vec());
        self.next_id += 1;
        self.pos = end + 1;
        Some(segment)
    }
}
