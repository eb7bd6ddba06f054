//! Broker connection and message routing

use crate::{capture::ControlCommand, LinkError};
use chrono::{DateTime, Utc};
use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use sample_stream::{parse_energy_payload, Sample};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// MQTT link configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker hostname
    pub broker_host: String,
    /// Broker port
    pub broker_port: u16,
    /// Client id prefix
    pub client_id: String,
    /// Topic carrying `{"ts", "current"}` energy readings
    pub topic_energy: String,
    /// Topic carrying `{"control"}` capture commands
    pub topic_control: String,
    /// Topic carrying `{"timestamp", "label", "info"}` brew labels
    pub topic_labels: String,
    /// Topic predictions are published to
    pub topic_predictions: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "coffee-pipeline".to_string(),
            topic_energy: "coffee/energy/data".to_string(),
            topic_control: "coffee/machine/control".to_string(),
            topic_labels: "coffee/machine/labels".to_string(),
            topic_predictions: "coffee/ai/prediction".to_string(),
        }
    }
}

/// A label message as it arrives on the wire
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawLabel {
    /// ISO-8601 machine timestamp
    pub timestamp: Option<String>,
    /// Product label
    pub label: Option<String>,
    /// Free-form extra info
    #[serde(default)]
    pub info: Option<String>,
}

impl RawLabel {
    /// Parse the machine timestamp, if present and valid
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}

/// One decoded broker message, in arrival order
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    /// Validated energy reading
    Energy(Sample),
    /// Capture control command
    Control(ControlCommand),
    /// Brew label from the machine
    Label(RawLabel),
}

/// Decode one publish into a link event.
///
/// Malformed payloads yield `None`: energy records drop silently per the
/// ingestion contract, control/label payloads warn inside their parsers.
pub fn route_publish(config: &MqttConfig, topic: &str, payload: &[u8]) -> Option<LinkEvent> {
    if topic == config.topic_energy {
        parse_energy_payload(payload).map(LinkEvent::Energy)
    } else if topic == config.topic_control {
        ControlCommand::parse(payload).map(LinkEvent::Control)
    } else if topic == config.topic_labels {
        match serde_json::from_slice::<RawLabel>(payload) {
            Ok(label) if label.timestamp.is_some() && label.label.is_some() => {
                Some(LinkEvent::Label(label))
            }
            Ok(_) => {
                warn!("label payload missing timestamp or label field");
                None
            }
            Err(e) => {
                warn!("label parse error: {}", e);
                None
            }
        }
    } else {
        debug!("ignoring message on unexpected topic {}", topic);
        None
    }
}

/// Connected broker client.
///
/// All subscriptions feed a single mpsc channel, so the consumer observes
/// samples strictly in arrival order regardless of how the transport
/// schedules its internals.
pub struct MqttLink {
    config: MqttConfig,
    client: AsyncClient,
}

impl MqttLink {
    /// Connect, subscribe, and start pumping decoded events into `events`.
    pub async fn connect(
        config: MqttConfig,
        events: mpsc::Sender<LinkEvent>,
    ) -> Result<Self, LinkError> {
        let mut options = MqttOptions::new(
            config.client_id.clone(),
            &config.broker_host,
            config.broker_port,
        );
        options.set_keep_alive(std::time::Duration::from_secs(30));

        let (client, mut eventloop) = AsyncClient::new(options, 64);

        for topic in [
            &config.topic_energy,
            &config.topic_control,
            &config.topic_labels,
        ] {
            client
                .subscribe(topic, QoS::AtLeastOnce)
                .await
                .map_err(|e| LinkError::Subscribe(e.to_string()))?;
        }
        info!(
            "connected to MQTT broker {}:{}",
            config.broker_host, config.broker_port
        );

        let route_config = config.clone();
        tokio::spawn(async move {
            loop {
                match eventloop.poll().await {
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        if let Some(event) =
                            route_publish(&route_config, &publish.topic, &publish.payload)
                        {
                            if events.send(event).await.is_err() {
                                debug!("event consumer gone, stopping MQTT pump");
                                break;
                            }
                        }
                    }
                    Ok(_) => {}
                    Err(e) => {
                        error!("MQTT error: {}", e);
                        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
                    }
                }
            }
        });

        Ok(Self { config, client })
    }

    /// Publish one prediction as `{"prediction": "<label>"}`.
    pub async fn publish_prediction(&self, label: &str) -> Result<(), LinkError> {
        #[derive(Serialize)]
        struct PredictionMessage<'a> {
            prediction: &'a str,
        }

        let payload = serde_json::to_vec(&PredictionMessage { prediction: label })
            .map_err(|e| LinkError::Publish(e.to_string()))?;

        self.client
            .publish(
                &self.config.topic_predictions,
                QoS::AtLeastOnce,
                false,
                payload,
            )
            .await
            .map_err(|e| LinkError::Publish(e.to_string()))
    }
}
