//! Inference engine: gate, align, classify

use crate::{Classifier, InferenceError};
use feature_engine::{FeatureSchema, FeatureVector, FeatureVectorBuilder};
use sample_stream::Segment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One classified brew cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Id of the segment the prediction came from
    pub segment_id: u64,
    /// Product label from the classifier
    pub label: String,
    /// The feature vector the classifier saw
    pub features: FeatureVector,
}

/// Drives feature extraction and classification for closed segments.
///
/// Construction validates the persisted schema against the feature builder
/// and fails hard on any misalignment; per-segment faults afterwards are
/// logged and skipped so the stream stays alive.
pub struct InferenceEngine {
    schema: FeatureSchema,
    builder: FeatureVectorBuilder,
    classifier: Box<dyn Classifier>,
}

impl InferenceEngine {
    /// Create an engine from a persisted schema.
    ///
    /// A schema referencing a column the builder cannot produce (or missing
    /// one it does) is a structural fault: the process must not proceed
    /// with misaligned columns, so this returns an error instead.
    pub fn new(
        schema: FeatureSchema,
        builder: FeatureVectorBuilder,
        classifier: Box<dyn Classifier>,
    ) -> Result<Self, InferenceError> {
        schema.validate()?;
        info!(
            "inference engine ready: {} feature columns, min {} samples per segment",
            schema.fields().len(),
            builder.min_samples()
        );
        Ok(Self {
            schema,
            builder,
            classifier,
        })
    }

    /// Extract features from a closed segment and classify them.
    ///
    /// Returns `None` when the segment is discarded by the minimum-sample
    /// gate or when the classifier fails; neither stops the caller's loop.
    pub fn process(&self, segment: &Segment) -> Option<Prediction> {
        let features = self.builder.build(segment)?;
        let row = features.to_row(&self.schema);

        match self.classifier.predict(&row) {
            Ok(label) => {
                debug!("segment {} classified as {}", segment.id(), label);
                Some(Prediction {
                    segment_id: segment.id(),
                    label,
                    features,
                })
            }
            Err(e) => {
                warn!("prediction skipped for segment {}: {}", segment.id(), e);
                None
            }
        }
    }
}
