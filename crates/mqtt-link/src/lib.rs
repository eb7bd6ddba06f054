//! MQTT Link
//!
//! Connects the pipeline to the broker: subscribes to the energy, control,
//! and label topics, funnels every decoded message into one mpsc channel so
//! downstream state (segmenter, capture machine) sees samples strictly in
//! arrival order, and publishes predictions.

mod capture;
mod link;

pub use capture::{CaptureState, ControlCommand};
pub use link::{LinkEvent, MqttConfig, MqttLink, RawLabel};

use thiserror::Error;

/// MQTT link error types
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("publish failed: {0}")]
    Publish(String),
}
