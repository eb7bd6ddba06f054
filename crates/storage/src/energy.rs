//! Energy log: `ts_shelly,current_A`

use crate::csv;
use crate::StorageError;
use sample_stream::Sample;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const HEADER: &str = "ts_shelly,current_A";

/// Append-only CSV log of raw meter readings.
pub struct EnergyLog {
    path: PathBuf,
}

impl EnergyLog {
    /// Open the log, creating the file with its header when absent.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut file = File::create(&path)?;
            writeln!(file, "{}", HEADER)?;
            debug!("created energy log {}", path.display());
        }
        Ok(Self { path })
    }

    /// Append one reading.
    pub fn append(&self, sample: &Sample) -> Result<(), StorageError> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "{},{}", sample.ts, sample.current)?;
        Ok(())
    }

    /// Read every reading in file order.
    ///
    /// Rows with an unparseable timestamp are dropped with a warning; an
    /// empty or unparseable current cell becomes NaN and is repaired during
    /// feature extraction, mirroring a missing meter value.
    pub fn read_all(&self) -> Result<Vec<Sample>, StorageError> {
        let file = File::open(&self.path)?;
        let mut lines = BufReader::new(file).lines();

        let header = lines.next().transpose()?;
        if header.as_deref().map(str::trim) != Some(HEADER) {
            return Err(StorageError::MalformedTable {
                path: self.path.display().to_string(),
                reason: format!("expected header '{}'", HEADER),
            });
        }

        let mut samples = Vec::new();
        for line in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields = csv::parse_line(&line);
            if fields.len() < 2 {
                warn!("dropping malformed energy row: {}", line);
                continue;
            }

            let ts = match fields[0].trim().parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => {
                    warn!("dropping energy row with bad timestamp: {}", line);
                    continue;
                }
            };
            let current = fields[1].trim().parse::<f64>().unwrap_or(f64::NAN);

            // Timestamp already validated finite
            if let Ok(sample) = Sample::new(ts, current) {
                samples.push(sample);
            }
        }
        Ok(samples)
    }
}
