//! Brew Cycle Segmentation
//!
//! Two interchangeable strategies that turn a sample stream into segments:
//! gap-based splitting for batch runs over a sorted log, and
//! threshold-crossing splitting for live sample-by-sample feeds.

mod gap;
mod threshold;

pub use gap::{GapBasedSegmenter, DEFAULT_BOUNDARY_THRESHOLD_S};
pub use threshold::{SegmenterState, ThresholdBasedSegmenter, DEFAULT_CURRENT_THRESHOLD_A};
