//! Raw record ingestion

use crate::{Sample, SampleError};
use serde::Deserialize;
use tracing::debug;

/// Wire shape of one energy reading: `{"ts": <s>, "current": <A>}`
#[derive(Debug, Deserialize)]
struct EnergyRecord {
    ts: Option<f64>,
    current: Option<f64>,
}

/// Parse one energy payload from the transport.
///
/// Returns `None` for anything malformed (invalid JSON, missing or
/// non-numeric fields, non-finite timestamp). Malformed records are dropped
/// with no error to the caller so a live stream stays alive.
pub fn parse_energy_payload(payload: &[u8]) -> Option<Sample> {
    let record: EnergyRecord = match serde_json::from_slice(payload) {
        Ok(r) => r,
        Err(e) => {
            debug!("dropping energy record: {}", e);
            return None;
        }
    };

    let sample = record
        .ts
        .zip(record.current)
        .ok_or(SampleError::MissingField("ts/current"))
        .and_then(|(ts, current)| Sample::new(ts, current));

    match sample {
        Ok(s) => Some(s),
        Err(e) => {
            debug!("dropping energy record: {}", e);
            None
        }
    }
}

/// Sort a batch of samples by timestamp (stable, total order over floats).
///
/// The batch path sorts before segmentation; the streaming path never calls
/// this and trusts arrival order.
pub fn sort_by_time(samples: &mut [Sample]) {
    samples.sort_by(|a, b| a.ts.total_cmp(&b.ts));
}
