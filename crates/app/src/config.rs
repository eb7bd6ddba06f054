//! Application configuration

use mqtt_link::MqttConfig;
use segmenter::{DEFAULT_BOUNDARY_THRESHOLD_S, DEFAULT_CURRENT_THRESHOLD_A};
use serde::Deserialize;
use std::path::PathBuf;

/// File locations for the persisted artifacts
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Raw meter readings (`ts_shelly,current_A`)
    pub energy_log: PathBuf,
    /// Machine-reported labels (`timestamp,label,info`)
    pub label_log: PathBuf,
    /// Labeled feature rows for training
    pub training_table: PathBuf,
    /// Ordered feature column names (JSON)
    pub schema_artifact: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            energy_log: PathBuf::from("energy_log.csv"),
            label_log: PathBuf::from("coffee_data.csv"),
            training_table: PathBuf::from("training_data.csv"),
            schema_artifact: PathBuf::from("feature_schema.json"),
        }
    }
}

/// Segmentation thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Inactivity gap that separates products in the batch run (seconds)
    pub boundary_threshold_s: f64,
    /// Current level separating idle draw from a brew cycle (amperes)
    pub current_threshold_a: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            boundary_threshold_s: DEFAULT_BOUNDARY_THRESHOLD_S,
            current_threshold_a: DEFAULT_CURRENT_THRESHOLD_A,
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mqtt: MqttConfig,
    pub paths: PathsConfig,
    pub segmentation: SegmentationConfig,
}

/// Load configuration: built-in defaults, overridden by an optional
/// `coffee-pipeline.toml` next to the binary, overridden by `COFFEE__*`
/// environment variables.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = ::config::Config::builder()
        .add_source(::config::File::with_name("coffee-pipeline").required(false))
        .add_source(::config::Environment::with_prefix("COFFEE").separator("__"))
        .build()?;
    Ok(settings.try_deserialize()?)
}
