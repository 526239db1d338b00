//! Edge-driven input classifier.
//!
//! Every level change of an enabled input produces at most one event. Pins
//! idle high (pull-ups) and an active input pulls its pin low; `invert` swaps
//! the two levels before classification.

use stateio_app::event_bus::EventQueue;
use stateio_app::ports::InputClassifier;
use stateio_domain::addressing::PinAddress;
use stateio_domain::channel::{InputConfig, InputType};
use stateio_domain::device::{DEVICE_COUNT, DeviceId, PINS_PER_DEVICE};
use stateio_domain::event::{InputPinEvent, PinEvent, RawState};

/// Classifies inputs from level changes between consecutive samples.
///
/// The first sample of each device only primes the previous levels. Buttons
/// report a single press on release; press and toggle inputs fire when the
/// input becomes active; level-driven types (contact, rotary, security,
/// switch) report the new level on every change.
#[derive(Debug, Clone, Default)]
pub struct EdgeInputClassifier {
    previous: [Option<u16>; DEVICE_COUNT as usize],
}

impl EdgeInputClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Raw state for an input whose (inversion-corrected) level is now `high`.
fn classify(input_type: InputType, high: bool) -> Option<RawState> {
    let level = if high { RawState::HIGH } else { RawState::LOW };
    match input_type {
        InputType::Button => high.then_some(RawState::presses(1)),
        InputType::Press | InputType::Toggle => (!high).then_some(level),
        InputType::Contact | InputType::Rotary | InputType::Security | InputType::Switch => {
            Some(level)
        }
    }
}

impl InputClassifier for EdgeInputClassifier {
    fn process(
        &mut self,
        device: DeviceId,
        pins: u16,
        configs: &[InputConfig; PINS_PER_DEVICE as usize],
        events: &mut EventQueue,
    ) {
        let Some(previous) = self.previous[device.as_usize()].replace(pins) else {
            return;
        };
        let changed = previous ^ pins;
        for (pin, config) in (0..PINS_PER_DEVICE).zip(configs) {
            if changed & (1 << pin) == 0 || config.disabled {
                continue;
            }
            let high = (pins & (1 << pin) != 0) != config.invert;
            let (Some(state), Some(address)) =
                (classify(config.input_type, high), PinAddress::new(device, pin))
            else {
                continue;
            };
            tracing::trace!(%address, input_type = %config.input_type, state = state.0, "input changed");
            events.push(PinEvent::Input(InputPinEvent {
                address,
                input_type: config.input_type,
                state,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: u16 = u16::MAX;

    fn device() -> DeviceId {
        DeviceId::new(0).unwrap()
    }

    fn configs(input_type: InputType) -> [InputConfig; PINS_PER_DEVICE as usize] {
        [InputConfig {
            input_type,
            ..InputConfig::default()
        }; PINS_PER_DEVICE as usize]
    }

    fn run(
        classifier: &mut EdgeInputClassifier,
        pins: u16,
        configs: &[InputConfig; PINS_PER_DEVICE as usize],
    ) -> Vec<InputPinEvent> {
        let mut queue = EventQueue::new();
        classifier.process(device(), pins, configs, &mut queue);
        queue
            .drain()
            .map(|event| match event {
                PinEvent::Input(input) => input,
                PinEvent::Output(_) => panic!("classifier raised an output event"),
            })
            .collect()
    }

    #[test]
    fn should_prime_on_first_sample() {
        let mut classifier = EdgeInputClassifier::new();
        assert!(run(&mut classifier, !1, &configs(InputType::Switch)).is_empty());
    }

    #[test]
    fn should_report_switch_levels_on_change() {
        let mut classifier = EdgeInputClassifier::new();
        let configs = configs(InputType::Switch);
        run(&mut classifier, IDLE, &configs);

        let closed = run(&mut classifier, !(1 << 5), &configs);
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].address.pin, 5);
        assert_eq!(closed[0].state, RawState::LOW);

        let opened = run(&mut classifier, IDLE, &configs);
        assert_eq!(opened[0].state, RawState::HIGH);
        assert!(run(&mut classifier, IDLE, &configs).is_empty());
    }

    #[test]
    fn should_report_single_press_on_button_release() {
        let mut classifier = EdgeInputClassifier::new();
        let configs = configs(InputType::Button);
        run(&mut classifier, IDLE, &configs);
        assert!(run(&mut classifier, !1, &configs).is_empty());
        let released = run(&mut classifier, IDLE, &configs);
        assert_eq!(released[0].state, RawState::presses(1));
    }

    #[test]
    fn should_fire_toggle_only_when_activated() {
        let mut classifier = EdgeInputClassifier::new();
        let configs = configs(InputType::Toggle);
        run(&mut classifier, IDLE, &configs);
        assert_eq!(run(&mut classifier, !1, &configs).len(), 1);
        assert!(run(&mut classifier, IDLE, &configs).is_empty());
    }

    #[test]
    fn should_honour_invert_and_disabled() {
        let mut classifier = EdgeInputClassifier::new();
        let mut configs = configs(InputType::Contact);
        configs[0].invert = true;
        configs[1].disabled = true;
        run(&mut classifier, IDLE, &configs);

        let events = run(&mut classifier, !0b11, &configs);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].address.pin, 0);
        assert_eq!(events[0].state, RawState::HIGH);
    }

    #[test]
    fn should_track_devices_independently() {
        let mut classifier = EdgeInputClassifier::new();
        let configs = configs(InputType::Switch);
        run(&mut classifier, IDLE, &configs);
        let mut queue = EventQueue::new();
        classifier.process(DeviceId::new(1).unwrap(), !1, &configs, &mut queue);
        assert!(queue.is_empty());
    }
}
