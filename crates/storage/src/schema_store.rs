//! Schema artifact persistence

use crate::StorageError;
use feature_engine::FeatureSchema;
use std::path::Path;
use tracing::info;

/// Write the schema artifact (ordered JSON list of column names).
///
/// Done once after the batch labeling run.
pub fn save_schema(path: impl AsRef<Path>, schema: &FeatureSchema) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(schema)?;
    std::fs::write(path.as_ref(), json)?;
    info!("wrote schema artifact {}", path.as_ref().display());
    Ok(())
}

/// Load the schema artifact at inference startup.
///
/// A missing or unreadable artifact is a structural fault the caller treats
/// as fatal; nothing here validates against the builder, that check belongs
/// to the inference engine.
pub fn load_schema(path: impl AsRef<Path>) -> Result<FeatureSchema, StorageError> {
    let json = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&json)?)
}
