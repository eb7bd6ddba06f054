//! Classifier capability

use crate::InferenceError;

/// Opaque classification capability: one schema-ordered feature row in, one
/// product label out.
///
/// The engine guarantees column identity and order against the persisted
/// schema; column semantics are the implementation's concern.
pub trait Classifier: Send + Sync {
    /// Predict the product label for one feature row
    fn predict(&self, row: &[Option<f64>]) -> Result<String, InferenceError>;
}

/// Rule-based development classifier.
///
/// Stands in for the trained model so the live loop is runnable end to end;
/// thresholds are rough buckets over cycle duration and energy.
#[derive(Debug, Clone, Default)]
pub struct RuleClassifier;

impl RuleClassifier {
    /// Row positions in the canonical schema order
    const CYCLE_DURATION: usize = 1;
    const AREA_UNDER_CURVE: usize = 2;
}

impl Classifier for RuleClassifier {
    fn predict(&self, row: &[Option<f64>]) -> Result<String, InferenceError> {
        let duration = row
            .get(Self::CYCLE_DURATION)
            .copied()
            .flatten()
            .ok_or_else(|| InferenceError::ClassifierFailed("missing cycle duration".into()))?;
        let area = row
            .get(Self::AREA_UNDER_CURVE)
            .copied()
            .flatten()
            .ok_or_else(|| InferenceError::ClassifierFailed("missing area under curve".into()))?;

        let label = if duration < 25.0 {
            "espresso"
        } else if area > 60.0 {
            "cappuccino"
        } else {
            "lungo"
        };
        Ok(label.to_string())
    }
}
