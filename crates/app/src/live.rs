//! Live prediction loop
//!
//! One owner task consumes broker events in arrival order: the threshold
//! segmenter's `(state, buffer)` pair is touched only here, so no sample
//! can be appended to the wrong segment or trigger a spurious transition.
//! Closed segments are extracted, schema-aligned, classified, and the label
//! is published back to the broker.

use crate::AppConfig;
use anyhow::Context;
use feature_engine::FeatureVectorBuilder;
use inference_engine::{InferenceEngine, RuleClassifier};
use mqtt_link::{CaptureState, LinkEvent, MqttLink};
use segmenter::ThresholdBasedSegmenter;
use storage::{load_schema, EnergyLog, LabelLog, LabelRecord};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Run the live loop until ctrl-c.
///
/// Startup is strict: a missing or misaligned schema artifact aborts before
/// any prediction is attempted. Everything after startup recovers locally.
pub async fn run_live(config: AppConfig) -> anyhow::Result<()> {
    let schema = load_schema(&config.paths.schema_artifact)
        .context("cannot load schema artifact (run coffee-batch first)")?;
    let engine = InferenceEngine::new(
        schema,
        FeatureVectorBuilder::streaming(),
        Box::new(RuleClassifier),
    )?;

    let energy_log = EnergyLog::open(&config.paths.energy_log)?;
    let label_log = LabelLog::open(&config.paths.label_log)?;

    let (tx, mut rx) = mpsc::channel::<LinkEvent>(256);
    let link = MqttLink::connect(config.mqtt.clone(), tx).await?;

    let mut brew_segmenter = ThresholdBasedSegmenter::new(config.segmentation.current_threshold_a);
    let mut capture = CaptureState::default();

    info!("live prediction loop started");
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else {
                    warn!("broker event stream closed");
                    break;
                };
                handle_event(
                    event,
                    &mut brew_segmenter,
                    &mut capture,
                    &engine,
                    &energy_log,
                    &label_log,
                    &link,
                )
                .await;
            }
            _ = &mut shutdown => {
                // An unterminated segment has unknown true duration; flushing
                // it would poison the statistics, so it is discarded.
                let dropped = brew_segmenter.discard_in_flight();
                info!("shutting down ({} buffered samples discarded)", dropped);
                break;
            }
        }
    }

    Ok(())
}

async fn handle_event(
    event: LinkEvent,
    brew_segmenter: &mut ThresholdBasedSegmenter,
    capture: &mut CaptureState,
    engine: &InferenceEngine,
    energy_log: &EnergyLog,
    label_log: &LabelLog,
    link: &MqttLink,
) {
    match event {
        LinkEvent::Energy(sample) => {
            if capture.is_logging() {
                if let Err(e) = energy_log.append(&sample) {
                    warn!("energy log write failed: {}", e);
                }
            }

            if let Some(segment) = brew_segmenter.push(sample) {
                if let Some(prediction) = engine.process(&segment) {
                    info!(
                        "segment {} ({} samples): predicted {}",
                        prediction.segment_id, prediction.features.samples, prediction.label
                    );
                    if let Err(e) = link.publish_prediction(&prediction.label).await {
                        warn!("prediction publish failed: {}", e);
                    }
                }
            }
        }
        LinkEvent::Control(command) => {
            capture.apply(command);
        }
        LinkEvent::Label(raw) => {
            let record = LabelRecord {
                timestamp: raw.parsed_timestamp(),
                label: raw.label.clone().unwrap_or_default(),
                info: raw.info.clone().unwrap_or_default(),
            };
            if let Err(e) = label_log.append(&record) {
                warn!("label log write failed: {}", e);
            }
        }
    }
}
