//! Flat-File Persistence
//!
//! The pipeline's persisted artifacts are three small CSV tables (energy
//! log, coffee label log, training table) and one JSON schema artifact.
//! Writers create the file with its header on first use and append
//! afterwards.

mod csv;
mod energy;
mod labels;
mod schema_store;
mod training;

pub use energy::EnergyLog;
pub use labels::{LabelLog, LabelRecord};
pub use schema_store::{load_schema, save_schema};
pub use training::{TrainingRow, TrainingWriter};

use thiserror::Error;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem fault
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema artifact is not valid JSON
    #[error("unreadable schema artifact: {0}")]
    MalformedSchema(#[from] serde_json::Error),

    /// A persisted table is missing required columns
    #[error("malformed table {path}: {reason}")]
    MalformedTable { path: String, reason: String },
}
