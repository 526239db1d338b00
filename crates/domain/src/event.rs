//! Pin events and the status payloads published for them.
//!
//! Collaborators report what happened on a pin as a [`PinEvent`]: the pin's
//! address, the configured channel type and a raw state code. Rendering turns
//! that into the event name of the fixed vocabulary below and, together with
//! the logical index, into an [`InputStatus`] or [`OutputStatus`] payload.
//!
//! | type | raw state → event |
//! |------|-------------------|
//! | button | 0 hold, 1 single, 2 double, 3 triple, 4 quad, 5 penta |
//! | contact | 0 closed, 1 open |
//! | press | press |
//! | rotary | 0 up, 1 down |
//! | security | 1 normal, 0 alarm, 2 tamper, 3 short, 4 fault |
//! | switch | 0 on, 1 off |
//! | toggle | toggle |
//! | relay / motor / timer | 1 on, 0 off |
//!
//! Anything else renders as `"error"`.

use serde::Serialize;

use crate::addressing::{ChannelIndex, PinAddress, PortChannel};
use crate::channel::{InputType, OutputType};

/// Event name used when a state code has no meaning for the channel type.
pub const UNKNOWN_EVENT: &str = "error";

/// Raw state code reported by the input classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawState(pub u8);

impl RawState {
    /// Pin went (or is held) low.
    pub const LOW: Self = Self(0);
    /// Pin went (or is held) high.
    pub const HIGH: Self = Self(1);
    /// Button held down; shares the code of [`LOW`](Self::LOW).
    pub const HOLD: Self = Self(0);
    /// Security loop tampered.
    pub const TAMPER: Self = Self(2);
    /// Security loop shorted.
    pub const SHORT: Self = Self(3);
    /// Security loop faulted.
    pub const FAULT: Self = Self(4);

    /// Button released after `count` presses (1..=5).
    #[must_use]
    pub const fn presses(count: u8) -> Self {
        Self(count)
    }
}

/// Physical level of an output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputLevel {
    Off,
    On,
}

impl OutputLevel {
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl From<bool> for OutputLevel {
    fn from(high: bool) -> Self {
        if high { Self::On } else { Self::Off }
    }
}

/// Something an input collaborator observed on one pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPinEvent {
    pub address: PinAddress,
    pub input_type: InputType,
    pub state: RawState,
}

/// An output pin changing level (or being queried).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPinEvent {
    pub address: PinAddress,
    pub output_type: OutputType,
    pub level: OutputLevel,
}

/// A pin event from either bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinEvent {
    Input(InputPinEvent),
    Output(OutputPinEvent),
}

impl PinEvent {
    #[must_use]
    pub const fn address(&self) -> PinAddress {
        match self {
            Self::Input(event) => event.address,
            Self::Output(event) => event.address,
        }
    }
}

/// Name of the event an input of `input_type` reports for `state`.
#[must_use]
pub const fn input_event_name(input_type: InputType, state: RawState) -> &'static str {
    match (input_type, state.0) {
        (InputType::Button, 0) => "hold",
        (InputType::Button, 1) => "single",
        (InputType::Button, 2) => "double",
        (InputType::Button, 3) => "triple",
        (InputType::Button, 4) => "quad",
        (InputType::Button, 5) => "penta",
        (InputType::Contact, 0) => "closed",
        (InputType::Contact, 1) => "open",
        (InputType::Press, _) => "press",
        (InputType::Rotary, 0) => "up",
        (InputType::Rotary, 1) => "down",
        (InputType::Security, 1) => "normal",
        (InputType::Security, 0) => "alarm",
        (InputType::Security, 2) => "tamper",
        (InputType::Security, 3) => "short",
        (InputType::Security, 4) => "fault",
        (InputType::Switch, 0) => "on",
        (InputType::Switch, 1) => "off",
        (InputType::Toggle, _) => "toggle",
        _ => UNKNOWN_EVENT,
    }
}

/// Status payload published for an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputStatus {
    pub port: u16,
    pub channel: u16,
    pub index: ChannelIndex,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub event: &'static str,
}

impl InputStatus {
    #[must_use]
    pub const fn new(index: ChannelIndex, input_type: InputType, state: RawState) -> Self {
        let PortChannel { port, channel } = PortChannel::of(index);
        Self {
            port,
            channel,
            index,
            input_type,
            event: input_event_name(input_type, state),
        }
    }
}

/// Status payload published for an output event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputStatus {
    pub index: ChannelIndex,
    #[serde(rename = "type")]
    pub output_type: OutputType,
    pub event: &'static str,
}

impl OutputStatus {
    #[must_use]
    pub const fn new(index: ChannelIndex, output_type: OutputType, level: OutputLevel) -> Self {
        Self {
            index,
            output_type,
            event: level.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_button_presses_by_count() {
        let names: Vec<&str> = (0..=5)
            .map(|n| input_event_name(InputType::Button, RawState(n)))
            .collect();
        assert_eq!(names, ["hold", "single", "double", "triple", "quad", "penta"]);
        assert_eq!(input_event_name(InputType::Button, RawState(6)), UNKNOWN_EVENT);
    }

    #[test]
    fn should_name_level_driven_inputs() {
        assert_eq!(input_event_name(InputType::Contact, RawState::LOW), "closed");
        assert_eq!(input_event_name(InputType::Contact, RawState::HIGH), "open");
        assert_eq!(input_event_name(InputType::Rotary, RawState::LOW), "up");
        assert_eq!(input_event_name(InputType::Rotary, RawState::HIGH), "down");
        assert_eq!(input_event_name(InputType::Switch, RawState::LOW), "on");
        assert_eq!(input_event_name(InputType::Switch, RawState::HIGH), "off");
    }

    #[test]
    fn should_name_security_states() {
        assert_eq!(input_event_name(InputType::Security, RawState::HIGH), "normal");
        assert_eq!(input_event_name(InputType::Security, RawState::LOW), "alarm");
        assert_eq!(input_event_name(InputType::Security, RawState::TAMPER), "tamper");
        assert_eq!(input_event_name(InputType::Security, RawState::SHORT), "short");
        assert_eq!(input_event_name(InputType::Security, RawState::FAULT), "fault");
    }

    #[test]
    fn should_ignore_state_for_press_and_toggle() {
        for state in [RawState::LOW, RawState::HIGH, RawState(9)] {
            assert_eq!(input_event_name(InputType::Press, state), "press");
            assert_eq!(input_event_name(InputType::Toggle, state), "toggle");
        }
    }

    #[test]
    fn should_serialize_input_status_with_port_and_channel() {
        let status = InputStatus::new(ChannelIndex::new(67), InputType::Contact, RawState::HIGH);
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({
                "port": 17,
                "channel": 3,
                "index": 67,
                "type": "contact",
                "event": "open"
            })
        );
    }

    #[test]
    fn should_serialize_output_status() {
        let status = OutputStatus::new(ChannelIndex::new(65), OutputType::Relay, OutputLevel::On);
        assert_eq!(
            serde_json::to_value(status).unwrap(),
            serde_json::json!({"index": 65, "type": "relay", "event": "on"})
        );
    }

    #[test]
    fn should_map_pin_level_to_output_level() {
        assert_eq!(OutputLevel::from(true), OutputLevel::On);
        assert!(!OutputLevel::from(false).is_on());
    }
}
