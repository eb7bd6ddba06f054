//! Product Inference Engine
//!
//! Maps feature vectors to product labels behind an opaque classifier
//! capability. Owns the startup check that the persisted schema and the
//! feature builder agree; everything past that check is per-segment and
//! locally recovered.

mod classifier;
mod engine;

pub use classifier::{Classifier, RuleClassifier};
pub use engine::{InferenceEngine, Prediction};

use feature_engine::FeatureError;
use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Persisted schema does not match the feature builder (fatal at startup)
    #[error(transparent)]
    Schema(#[from] FeatureError),

    /// The external classifier rejected a feature row
    #[error("classifier failed: {0}")]
    ClassifierFailed(String),
}
