//! Feature Engineering Engine
//!
//! Reduces one brew-cycle segment to a fixed-width feature vector:
//! missing-value repair, Savitzky-Golay smoothing, Simpson integration,
//! summary statistics, and adaptive peak detection. The same code path runs
//! in the batch labeling run and in the live prediction loop, so the two
//! modes produce numerically identical features by construction.

mod features;
mod peaks;
mod schema;
mod smoothing;
mod statistics;

pub use features::{
    FeatureVector, FeatureVectorBuilder, FIELD_NAMES, MIN_SAMPLES_BATCH, MIN_SAMPLES_STREAMING,
};
pub use peaks::{detect_peaks, PeakSummary};
pub use schema::FeatureSchema;
pub use smoothing::{repair_missing, smooth, window_params, SmoothedSignal};
pub use statistics::{simpson, SegmentStats};

use thiserror::Error;

/// Errors during feature engineering
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// Persisted schema and builder columns disagree in names or order
    #[error("schema mismatch: persisted columns {found:?} do not match builder columns {expected:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}
