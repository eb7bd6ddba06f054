//! Coffee label log: `timestamp,label,info`

use crate::csv;
use crate::StorageError;
use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const HEADER: &str = "timestamp,label,info";

/// One labeled brew, reported by the coffee machine itself
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    /// Machine timestamp; unparseable timestamps are kept as `None` and
    /// sort before dated records in file order
    pub timestamp: Option<DateTime<Utc>>,
    /// Product label, e.g. "espresso"
    pub label: String,
    /// Free-form extra info from the machine
    pub info: String,
}

/// Append-only CSV log of product labels used by the batch labeling run.
pub struct LabelLog {
    path: PathBuf,
}

impl LabelLog {
    /// Open the log, creating the file with its header when absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut file = File::create(&path)?;
            writeln!(file, "{}", HEADER)?;
            debug!("created label log {}", path.display());
        }
        Ok(Self { path })
    }

    /// Append one label record.
    pub fn append(&self, record: &LabelRecord) -> Result<(), StorageError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        let ts = record
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();
        writeln!(
            file,
            "{},{},{}",
            csv::escape(&ts),
            csv::escape(&record.label),
            csv::escape(&record.info)
        )?;
        Ok(())
    }

    /// Read all labels, sorted by timestamp (stable, so rows without a
    /// parseable timestamp keep their file order).
    pub fn read_all(&self) -> Result<Vec<LabelRecord>, StorageError> {
        let file = File::open(&self.path)?;
        let mut lines = BufReader::new(file).lines();

        let header = lines.next().transpose()?;
        if header.as_deref().map(str::trim) != Some(HEADER) {
            return Err(StorageError::MalformedTable {
                path: self.path.display().to_string(),
                reason: format!("expected header '{}'", HEADER),
            });
        }

        let mut records = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = csv::parse_line(&line);
            if fields.len() < 2 {
                warn!("dropping malformed label row: {}", line);
                continue;
            }

            records.push(LabelRecord {
                timestamp: DateTime::parse_from_rfc3339(fields[0].trim())
                    .ok()
                    .map(|t| t.with_timezone(&Utc)),
                label: fields[1].clone(),
                info: fields.get(2).cloned().unwrap_or_default(),
            });
        }

        records.sort_by_key(|r| r.timestamp);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_append_and_read_sorted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coffee_data.csv");
        let log = LabelLog::open(&path).unwrap();

        log.append(&LabelRecord {
            timestamp: Some("2025-11-05T18:07:22.165Z".parse().unwrap()),
            label: "lungo".to_string(),
            info: "group A".to_string(),
        })
        .unwrap();
        log.append(&LabelRecord {
            timestamp: Some("2025-11-05T17:55:01Z".parse().unwrap()),
            label: "espresso".to_string(),
            info: String::new(),
        })
        .unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 2);
        // Sorted by timestamp, not file order
        assert_eq!(records[0].label, "espresso");
        assert_eq!(records[1].label, "lungo");
    }

    #[test]
    fn test_headerless_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("coffee_data.csv");
        std::fs::write(&path, "").unwrap();

        let result = LabelLog::open(&path).unwrap().read_all();
        assert!(matches!(result, Err(StorageError::MalformedTable { .. })));
    }

    #[test]
    fn test_label_with_comma_round_trips() {
        let dir = tempdir().unwrap();
        let log = LabelLog::open(dir.path().join("coffee_data.csv")).unwrap();
        log.append(&LabelRecord {
            timestamp: None,
            label: "flat white, large".to_string(),
            info: "promo \"double\"".to_string(),
        })
        .unwrap();

        let records = log.read_all().unwrap();
        assert_eq!(records[0].label, "flat white, large");
        assert_eq!(records[0].info, "promo \"double\"");
        assert_eq!(records[0].timestamp, None);
    }
}
