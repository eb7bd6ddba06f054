//! Feature schema contract

use crate::features::FIELD_NAMES;
use crate::FeatureError;
use serde::{Deserialize, Serialize};

/// The persisted, ordered list of feature column names.
///
/// Written once after the batch labeling run, loaded read-only when the
/// live predictor starts. It is the consistency contract between training
/// and inference: the builder's output columns must equal the schema
/// exactly, in names and in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSchema {
    fields: Vec<String>,
}

impl FeatureSchema {
    /// Schema matching the current builder's output columns
    pub fn canonical() -> Self {
        Self {
            fields: FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Wrap an already-persisted column list
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    /// Column names in order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Check this schema against the builder's columns.
    ///
    /// Any difference in names, order, or count is a structural fault: the
    /// caller must treat it as fatal at startup rather than predict with
    /// misaligned columns.
    pub fn validate(&self) -> Result<(), FeatureError> {
        if self.fields.len() == FIELD_NAMES.len()
            && self.fields.iter().zip(FIELD_NAMES).all(|(a, b)| a == b)
        {
            Ok(())
        } else {
            Err(FeatureError::SchemaMismatch {
                expected: FIELD_NAMES.iter().map(|s| s.to_string()).collect(),
                found: self.fields.clone(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_schema_validates() {
        assert!(FeatureSchema::canonical().validate().is_ok());
    }

    #[test]
    fn test_unknown_field_fails() {
        let mut fields: Vec<String> = FIELD_NAMES.iter().map(|s| s.to_string()).collect();
        fields.push("median_current".to_string());
        assert!(FeatureSchema::new(fields).validate().is_err());
    }

    #[test]
    fn test_missing_field_fails() {
        let fields: Vec<String> = FIELD_NAMES[..7].iter().map(|s| s.to_string()).collect();
        assert!(FeatureSchema::new(fields).validate().is_err());
    }

    #[test]
    fn test_reordered_fields_fail() {
        let mut fields: Vec<String> = FIELD_NAMES.iter().map(|s| s.to_string()).collect();
        fields.swap(0, 1);
        assert!(FeatureSchema::new(fields).validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let schema = FeatureSchema::canonical();
        let json = serde_json::to_string(&schema).unwrap();
        let loaded: FeatureSchema = serde_json::from_str(&json).unwrap();
        assert_eq!(schema, loaded);
    }
}
