//! Offline labeling run
//!
//! Reads the historical energy log, splits it on inactivity gaps, extracts
//! one feature row per valid segment, attaches machine-reported labels in
//! brew order, and appends the rows to the training table. Also persists
//! the schema artifact the live predictor validates against.

use crate::AppConfig;
use feature_engine::{FeatureSchema, FeatureVectorBuilder};
use sample_stream::{sort_by_time, Sample};
use segmenter::GapBasedSegmenter;
use storage::{save_schema, EnergyLog, LabelLog, LabelRecord, TrainingRow, TrainingWriter};
use tracing::{info, warn};

/// Outcome of one batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    /// Segments found in the energy log
    pub segments: usize,
    /// Feature rows appended to the training table
    pub rows_written: usize,
}

/// Turn sorted samples plus ordered labels into training rows.
///
/// Labels are consumed in order by segments that produce a feature row;
/// segments discarded by the minimum-sample gate do not consume a label.
/// When labels run out the row is still written, with an empty label cell.
fn build_training_rows(
    samples: &[Sample],
    labels: &[LabelRecord],
    gap_segmenter: &GapBasedSegmenter,
    builder: &FeatureVectorBuilder,
    schema: &FeatureSchema,
) -> (usize, Vec<TrainingRow>) {
    let mut rows = Vec::new();
    let mut label_idx = 0;
    let mut segments = 0;

    for segment in gap_segmenter.segments(samples) {
        segments += 1;
        let Some(vector) = builder.build(&segment) else {
            continue;
        };

        let product_label = labels.get(label_idx).map(|r| r.label.clone());
        if product_label.is_none() {
            warn!(
                "segment {} has no matching label ({} labels for more rows)",
                segment.id(),
                labels.len()
            );
        }
        label_idx += 1;

        rows.push(TrainingRow {
            segment_id: segment.id(),
            product_label,
            features: vector.to_row(schema),
        });
    }

    (segments, rows)
}

/// Run the offline labeling pass end to end.
pub fn run_batch(config: &AppConfig) -> anyhow::Result<BatchSummary> {
    let mut samples = EnergyLog::open(&config.paths.energy_log)?.read_all()?;
    sort_by_time(&mut samples);
    info!("loaded {} energy readings", samples.len());

    let labels = LabelLog::open(&config.paths.label_log)?.read_all()?;
    info!("loaded {} labels", labels.len());

    let gap_segmenter = GapBasedSegmenter::new(config.segmentation.boundary_threshold_s);
    let builder = FeatureVectorBuilder::batch();
    let schema = FeatureSchema::canonical();

    let (segments, rows) = build_training_rows(&samples, &labels, &gap_segmenter, &builder, &schema);

    if rows.is_empty() {
        info!("no segments/features produced (check threshold and data)");
    } else {
        TrainingWriter::open(&config.paths.training_table, schema.clone())?.append(&rows)?;
    }
    save_schema(&config.paths.schema_artifact, &schema)?;

    Ok(BatchSummary {
        segments,
        rows_written: rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(name: &str) -> LabelRecord {
        LabelRecord {
            timestamp: None,
            label: name.to_string(),
            info: String::new(),
        }
    }

    fn readings(points: &[(f64, f64)]) -> Vec<Sample> {
        points
            .iter()
            .map(|&(ts, current)| Sample::new(ts, current).unwrap())
            .collect()
    }

    #[test]
    fn test_labels_follow_row_order() {
        // Two brews separated by a 20-second gap
        let samples = readings(&[
            (0.0, 0.2),
            (1.0, 0.5),
            (2.0, 0.3),
            (30.0, 0.8),
            (31.0, 0.9),
            (32.0, 0.7),
        ]);
        let labels = vec![label("espresso"), label("lungo")];

        let (segments, rows) = build_training_rows(
            &samples,
            &labels,
            &GapBasedSegmenter::default(),
            &FeatureVectorBuilder::batch(),
            &FeatureSchema::canonical(),
        );

        assert_eq!(segments, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].segment_id, 0);
        assert_eq!(rows[0].product_label.as_deref(), Some("espresso"));
        assert_eq!(rows[1].segment_id, 1);
        assert_eq!(rows[1].product_label.as_deref(), Some("lungo"));
    }

    #[test]
    fn test_gated_segment_does_not_consume_label() {
        // Middle group has only 2 samples and is discarded by the gate
        let samples = readings(&[
            (0.0, 0.2),
            (1.0, 0.5),
            (2.0, 0.3),
            (30.0, 0.8),
            (31.0, 0.9),
            (60.0, 0.4),
            (61.0, 0.5),
            (62.0, 0.6),
        ]);
        let labels = vec![label("espresso"), label("lungo")];

        let (segments, rows) = build_training_rows(
            &samples,
            &labels,
            &GapBasedSegmenter::default(),
            &FeatureVectorBuilder::batch(),
            &FeatureSchema::canonical(),
        );

        assert_eq!(segments, 3);
        assert_eq!(rows.len(), 2);
        // The discarded segment still consumed id 1 but not a label
        assert_eq!(rows[1].segment_id, 2);
        assert_eq!(rows[1].product_label.as_deref(), Some("lungo"));
    }

    #[test]
    fn test_label_exhaustion_writes_empty_label() {
        let samples = readings(&[(0.0, 0.2), (1.0, 0.5), (2.0, 0.3)]);

        let (_, rows) = build_training_rows(
            &samples,
            &[],
            &GapBasedSegmenter::default(),
            &FeatureVectorBuilder::batch(),
            &FeatureSchema::canonical(),
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_label, None);
    }

    #[test]
    fn test_run_batch_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            paths: crate::PathsConfig {
                energy_log: dir.path().join("energy_log.csv"),
                label_log: dir.path().join("coffee_data.csv"),
                training_table: dir.path().join("training_data.csv"),
                schema_artifact: dir.path().join("feature_schema.json"),
            },
            ..AppConfig::default()
        };

        let energy = EnergyLog::open(&config.paths.energy_log).unwrap();
        for (ts, current) in [(0.0, 0.2), (1.0, 0.5), (2.0, 0.3), (30.0, 0.8), (31.0, 0.9), (32.0, 0.7)] {
            energy.append(&Sample::new(ts, current).unwrap()).unwrap();
        }
        let label_log = LabelLog::open(&config.paths.label_log).unwrap();
        label_log.append(&label("espresso")).unwrap();
        label_log.append(&label("lungo")).unwrap();

        let summary = run_batch(&config).unwrap();
        assert_eq!(summary.segments, 2);
        assert_eq!(summary.rows_written, 2);

        // Schema artifact is written and loads back
        let schema = storage::load_schema(&config.paths.schema_artifact).unwrap();
        assert!(schema.validate().is_ok());

        let table = std::fs::read_to_string(&config.paths.training_table).unwrap();
        assert_eq!(table.lines().count(), 3);
    }
}
