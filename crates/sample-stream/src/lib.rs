//! Sample Stream Primitives
//!
//! Validated `(timestamp, current)` readings and the segments built from
//! them. Source of truth for both the batch and the streaming path.

mod ingest;
mod sample;
mod segment;

pub use ingest::{parse_energy_payload, sort_by_time};
pub use sample::{Sample, SampleError};
pub use segment::Segment;
