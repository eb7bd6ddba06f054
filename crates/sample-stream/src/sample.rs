//! Current-draw sample type

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a sample from raw input
#[derive(Debug, Clone, Error)]
pub enum SampleError {
    /// A required field is missing or not a number
    #[error("Missing or non-numeric field: {0}")]
    MissingField(&'static str),

    /// Timestamp is NaN or infinite
    #[error("Non-finite timestamp: {0}")]
    NonFiniteTimestamp(f64),
}

/// One electrical reading from the power meter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Meter timestamp in seconds
    pub ts: f64,
    /// Current draw in amperes
    pub current: f64,
}

impl Sample {
    /// Create a sample, rejecting non-finite timestamps.
    ///
    /// The current may be non-finite: a reading with a valid timestamp but
    /// a missing measurement stays in the stream as NaN and is repaired
    /// during feature extraction.
    pub fn new(ts: f64, current: f64) -> Result<Self, SampleError> {
        if !ts.is_finite() {
            return Err(SampleError::NonFiniteTimestamp(ts));
        }
        Ok(Self { ts, current })
    }

    /// Whether the current reading itself is usable
    pub fn has_valid_current(&self) -> bool {
        self.current.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sample() {
        let s = Sample::new(12.5, 0.31).unwrap();
        assert_eq!(s.ts, 12.5);
        assert_eq!(s.current, 0.31);
    }

    #[test]
    fn test_nan_timestamp_rejected() {
        assert!(Sample::new(f64::NAN, 0.3).is_err());
        assert!(Sample::new(f64::INFINITY, 0.3).is_err());
    }

    #[test]
    fn test_nan_current_kept() {
        let s = Sample::new(1.0, f64::NAN).unwrap();
        assert!(!s.has_valid_current());
    }
}
