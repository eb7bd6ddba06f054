//! Training table: labeled feature rows

use crate::csv;
use crate::StorageError;
use feature_engine::FeatureSchema;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// One labeled feature row for the training table.
///
/// `segment_id` and `product_label` are attached by the offline labeling
/// run; the feature columns come from the extraction pipeline. Absent
/// numeric values are written as empty cells, never as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub segment_id: u64,
    pub product_label: Option<String>,
    pub features: Vec<Option<f64>>,
}

/// Appends labeled feature rows to the training CSV.
///
/// The header (`segment_id,product_label,` + schema columns) is written only
/// when the file is created; later runs append rows under the existing
/// header.
pub struct TrainingWriter {
    path: PathBuf,
    schema: FeatureSchema,
}

impl TrainingWriter {
    /// Open the training table for the given schema.
    pub fn open(path: impl AsRef<Path>, schema: FeatureSchema) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut file = std::fs::File::create(&path)?;
            let mut header = vec!["segment_id".to_string(), "product_label".to_string()];
            header.extend(schema.fields().iter().cloned());
            writeln!(file, "{}", header.join(","))?;
            info!("created training table {}", path.display());
        }
        Ok(Self { path, schema })
    }

    /// Append a batch of rows.
    pub fn append(&self, rows: &[TrainingRow]) -> Result<(), StorageError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        for row in rows {
            debug_assert_eq!(row.features.len(), self.schema.fields().len());
            let mut cells = vec![
                row.segment_id.to_string(),
                csv::escape(row.product_label.as_deref().unwrap_or("")),
            ];
            cells.extend(
                row.features
                    .iter()
                    .map(|v| v.map(|x| x.to_string()).unwrap_or_default()),
            );
            writeln!(file, "{}", cells.join(","))?;
        }
        info!("appended {} rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}
