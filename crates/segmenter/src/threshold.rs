//! Threshold-crossing segmentation for live feeds

use sample_stream::{Sample, Segment};
use tracing::{debug, info};

/// Default current threshold separating idle draw from a brew cycle (amperes)
pub const DEFAULT_CURRENT_THRESHOLD_A: f64 = 0.05;

/// Segmenter state over the live feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmenterState {
    /// Below threshold, no buffered samples
    #[default]
    Idle,
    /// Inside a brew cycle, buffering samples
    Active,
}

/// Splits an unbounded sample stream on a fixed current threshold.
///
/// Strict comparators on both edges: a reading exactly at the threshold
/// never triggers a transition. There is deliberately no hysteresis band,
/// so readings hovering around the threshold can open and close segments in
/// quick succession; the downstream minimum-sample gate absorbs those.
///
/// One instance owns exactly one buffer and one state flag and must observe
/// samples in arrival order from a single logical thread of control.
#[derive(Debug)]
pub struct ThresholdBasedSegmenter {
    threshold_a: f64,
    state: SegmenterState,
    buffer: Vec<Sample>,
    next_id: u64,
}

impl ThresholdBasedSegmenter {
    /// Create a segmenter with the given current threshold (amperes)
    pub fn new(threshold_a: f64) -> Self {
        Self {
            threshold_a,
            state: SegmenterState::Idle,
            buffer: Vec::new(),
            next_id: 0,
        }
    }

    /// Feed one sample; returns a segment when this sample closes one.
    ///
    /// The sample that starts a segment and the sample that closes it are
    /// both included in the buffered segment.
    pub fn push(&mut self, sample: Sample) -> Option<Segment> {
        match self.state {
            SegmenterState::Idle => {
                if sample.current > self.threshold_a {
                    self.state = SegmenterState::Active;
                    self.buffer.clear();
                    self.buffer.push(sample);
                    debug!(
                        "segment start: ts={:.3}, I={:.3} A",
                        sample.ts, sample.current
                    );
                }
                None
            }
            SegmenterState::Active => {
                self.buffer.push(sample);
                if sample.current < self.threshold_a {
                    self.state = SegmenterState::Idle;
                    let segment = Segment::new(self.next_id, std::mem::take(&mut self.buffer));
                    self.next_id += 1;
                    debug!("segment end: samples={}", segment.len());
                    Some(segment)
                } else {
                    None
                }
            }
        }
    }

    /// Current state of the machine
    pub fn state(&self) -> SegmenterState {
        self.state
    }

    /// Number of samples buffered for the in-flight segment
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Drop an in-flight segment on shutdown.
    ///
    /// An unterminated segment has unknown true duration and would poison
    /// the feature statistics, so it is discarded rather than flushed.
    /// Returns the number of samples thrown away.
    pub fn discard_in_flight(&mut self) -> usize {
        let dropped = self.buffer.len();
        if dropped > 0 {
            info!("discarding in-flight segment ({} samples)", dropped);
        }
        self.buffer.clear();
        self.state = SegmenterState::Idle;
        dropped
    }
}

impl Default for ThresholdBasedSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENT_THRESHOLD_A)
    }
}
