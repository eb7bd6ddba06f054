//! Capture-mode state machine

use serde::Deserialize;
use tracing::{info, warn};

/// Parsed control message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Begin logging energy samples
    Start,
    /// Stop logging ("end" and "stop" are synonyms on the wire)
    Stop,
}

impl ControlCommand {
    /// Parse a control payload: `{"control": "start"|"stop"|"end"}`.
    /// Unknown or malformed commands are warned and ignored.
    pub fn parse(payload: &[u8]) -> Option<Self> {
        #[derive(Deserialize)]
        struct ControlMessage {
            control: Option<String>,
        }

        let message: ControlMessage = match serde_json::from_slice(payload) {
            Ok(m) => m,
            Err(e) => {
                warn!("control parse error: {}", e);
                return None;
            }
        };

        match message.control.as_deref().map(str::trim) {
            Some(c) if c.eq_ignore_ascii_case("start") => Some(Self::Start),
            Some(c) if c.eq_ignore_ascii_case("stop") || c.eq_ignore_ascii_case("end") => {
                Some(Self::Stop)
            }
            other => {
                warn!("unknown control command: {:?}", other);
                None
            }
        }
    }
}

/// Whether the capture path is currently writing energy samples to disk.
///
/// An explicit two-state machine driven by control events and owned by a
/// single component; transitions happen nowhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    /// Energy samples are discarded
    #[default]
    Idle,
    /// Energy samples are appended to the energy log
    Logging,
}

impl CaptureState {
    /// Apply one control command; returns true when the state changed.
    pub fn apply(&mut self, command: ControlCommand) -> bool {
        let next = match command {
            ControlCommand::Start => Self::Logging,
            ControlCommand::Stop => Self::Idle,
        };
        let changed = *self != next;
        if changed {
            info!("capture state: {:?} -> {:?}", self, next);
            *self = next;
        }
        changed
    }

    /// Whether samples should currently be persisted
    pub fn is_logging(&self) -> bool {
        matches!(self, Self::Logging)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            ControlCommand::parse(br#"{"control": "start"}"#),
            Some(ControlCommand::Start)
        );
        assert_eq!(
            ControlCommand::parse(br#"{"control": "stop"}"#),
            Some(ControlCommand::Stop)
        );
        assert_eq!(
            ControlCommand::parse(br#"{"control": " END "}"#),
            Some(ControlCommand::Stop)
        );
    }

    #[test]
    fn test_unknown_or_malformed_ignored() {
        assert_eq!(ControlCommand::parse(br#"{"control": "pause"}"#), None);
        assert_eq!(ControlCommand::parse(br#"{}"#), None);
        assert_eq!(ControlCommand::parse(b"garbage"), None);
    }

    #[test]
    fn test_state_transitions() {
        let mut state = CaptureState::default();
        assert!(!state.is_logging());

        assert!(state.apply(ControlCommand::Start));
        assert!(state.is_logging());

        // Repeated start is a no-op
        assert!(!state.apply(ControlCommand::Start));
        assert!(state.is_logging());

        assert!(state.apply(ControlCommand::Stop));
        assert!(!state.is_logging());
    }
}
