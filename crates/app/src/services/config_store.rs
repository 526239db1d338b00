//! Channel configuration store: per-pin input and output settings.
//!
//! Configs are created with defaults for every pin at boot and only change
//! through the setters below. Everything is addressed by [`PinAddress`];
//! logical indices are resolved by the callers.

use std::num::NonZeroU32;

use stateio_domain::addressing::PinAddress;
use stateio_domain::channel::{DEFAULT_TIMER_SECS, InputConfig, InputType, OutputConfig, OutputType};
use stateio_domain::device::{DEVICE_COUNT, DeviceId, PINS_PER_DEVICE, Role};
use stateio_domain::layout::PartitionModel;

use crate::ports::{DisplayHints, DisplayPinType};

type DeviceInputs = [InputConfig; PINS_PER_DEVICE as usize];
type DeviceOutputs = [OutputConfig; PINS_PER_DEVICE as usize];

/// In-memory per-pin configuration of every device.
pub struct ChannelConfigStore<D> {
    model: PartitionModel,
    inputs: [DeviceInputs; DEVICE_COUNT as usize],
    outputs: [DeviceOutputs; DEVICE_COUNT as usize],
    display: D,
}

impl<D: DisplayHints> ChannelConfigStore<D> {
    /// Default configuration for every pin of the sealed partition.
    pub fn new(model: PartitionModel, display: D) -> Self {
        let mut outputs: DeviceOutputs = [OutputConfig::new(0); PINS_PER_DEVICE as usize];
        for (pin, config) in (0..PINS_PER_DEVICE).zip(outputs.iter_mut()) {
            *config = OutputConfig::new(pin);
        }
        Self {
            model,
            inputs: [[InputConfig::default(); PINS_PER_DEVICE as usize]; DEVICE_COUNT as usize],
            outputs: [outputs; DEVICE_COUNT as usize],
            display,
        }
    }

    #[must_use]
    pub const fn model(&self) -> &PartitionModel {
        &self.model
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    #[must_use]
    pub fn input(&self, address: PinAddress) -> InputConfig {
        self.inputs[address.device.as_usize()][usize::from(address.pin)]
    }

    #[must_use]
    pub fn inputs(&self, device: DeviceId) -> &DeviceInputs {
        &self.inputs[device.as_usize()]
    }

    #[must_use]
    pub fn output(&self, address: PinAddress) -> OutputConfig {
        self.outputs[address.device.as_usize()][usize::from(address.pin)]
    }

    #[must_use]
    pub fn outputs(&self, device: DeviceId) -> &DeviceOutputs {
        &self.outputs[device.as_usize()]
    }

    pub fn set_input_type(&mut self, address: PinAddress, input_type: InputType) {
        self.input_mut(address).input_type = input_type;
        let pin_type = if input_type == InputType::Security {
            DisplayPinType::Security
        } else {
            DisplayPinType::Default
        };
        self.display.set_pin_type(address, pin_type);
    }

    pub fn set_input_invert(&mut self, address: PinAddress, invert: bool) {
        self.input_mut(address).invert = invert;
        self.display.set_pin_invert(address, invert);
    }

    pub fn set_input_disabled(&mut self, address: PinAddress, disabled: bool) {
        self.input_mut(address).disabled = disabled;
        self.display.set_pin_disabled(address, disabled);
    }

    pub fn set_output_type(&mut self, address: PinAddress, output_type: OutputType) {
        self.output_mut(address).output_type = output_type;
    }

    /// Set the on-time of a timer output; `None` restores the default.
    pub fn set_timer(&mut self, address: PinAddress, seconds: Option<NonZeroU32>) {
        self.output_mut(address).timer = seconds.unwrap_or(DEFAULT_TIMER_SECS);
    }

    /// Interlock `address` with `partner_pin` on the same device; `None`
    /// clears the interlock.
    pub fn set_interlock(&mut self, address: PinAddress, partner_pin: Option<u8>) {
        self.output_mut(address).interlock = partner_pin.unwrap_or(address.pin);
    }

    /// Apply `input_type` to every pin of every present input device.
    pub fn apply_default_input_type(&mut self, input_type: InputType) {
        let devices: Vec<DeviceId> = self.model.devices(Role::Input).collect();
        for device in devices {
            for pin in 0..PINS_PER_DEVICE {
                if let Some(address) = PinAddress::new(device, pin) {
                    self.set_input_type(address, input_type);
                }
            }
        }
    }

    /// Apply `output_type` to every addressable pin of every present output device.
    pub fn apply_default_output_type(&mut self, output_type: OutputType) {
        let devices: Vec<DeviceId> = self.model.devices(Role::Output).collect();
        for device in devices {
            for pin in 0..self.model.addressable_pins(device) {
                if let Some(address) = PinAddress::new(device, pin) {
                    self.set_output_type(address, output_type);
                }
            }
        }
    }

    fn input_mut(&mut self, address: PinAddress) -> &mut InputConfig {
        &mut self.inputs[address.device.as_usize()][usize::from(address.pin)]
    }

    fn output_mut(&mut self, address: PinAddress) -> &mut OutputConfig {
        &mut self.outputs[address.device.as_usize()][usize::from(address.pin)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stateio_domain::device::DevicePresence;
    use stateio_domain::layout::{IoConfig, LayoutSettings, OutputDensity};

    #[derive(Default)]
    struct RecordingDisplay {
        pin_types: Vec<(PinAddress, DisplayPinType)>,
        inverts: Vec<(PinAddress, bool)>,
        disabled: Vec<(PinAddress, bool)>,
    }

    impl DisplayHints for RecordingDisplay {
        fn set_pin_type(&mut self, address: PinAddress, pin_type: DisplayPinType) {
            self.pin_types.push((address, pin_type));
        }

        fn set_pin_invert(&mut self, address: PinAddress, invert: bool) {
            self.inverts.push((address, invert));
        }

        fn set_pin_disabled(&mut self, address: PinAddress, disabled: bool) {
            self.disabled.push((address, disabled));
        }
    }

    fn store(io_config: IoConfig, density: OutputDensity) -> ChannelConfigStore<RecordingDisplay> {
        let model = PartitionModel::seal(
            LayoutSettings {
                io_config,
                outputs_per_device: density,
            },
            DevicePresence::ALL,
        );
        ChannelConfigStore::new(model, RecordingDisplay::default())
    }

    fn address(device: u8, pin: u8) -> PinAddress {
        PinAddress::new(DeviceId::new(device).unwrap(), pin).unwrap()
    }

    #[test]
    fn should_start_with_defaults() {
        let store = store(IoConfig::Io64In64Out, OutputDensity::Sixteen);
        assert_eq!(store.input(address(0, 0)), InputConfig::default());
        let output = store.output(address(5, 7));
        assert_eq!(output.output_type, OutputType::Relay);
        assert_eq!(output.timer, DEFAULT_TIMER_SECS);
        assert_eq!(output.interlock_partner(7), None);
    }

    #[test]
    fn should_forward_security_style_to_display() {
        let mut store = store(IoConfig::Io128In, OutputDensity::Sixteen);
        store.set_input_type(address(1, 2), InputType::Security);
        store.set_input_type(address(1, 3), InputType::Button);
        assert_eq!(store.input(address(1, 2)).input_type, InputType::Security);
        assert_eq!(
            store.display.pin_types,
            vec![
                (address(1, 2), DisplayPinType::Security),
                (address(1, 3), DisplayPinType::Default),
            ]
        );
    }

    #[test]
    fn should_forward_invert_and_disabled_to_display() {
        let mut store = store(IoConfig::Io128In, OutputDensity::Sixteen);
        store.set_input_invert(address(0, 1), true);
        store.set_input_disabled(address(0, 1), true);
        let config = store.input(address(0, 1));
        assert!(config.invert);
        assert!(config.disabled);
        assert_eq!(store.display.inverts, vec![(address(0, 1), true)]);
        assert_eq!(store.display.disabled, vec![(address(0, 1), true)]);
    }

    #[test]
    fn should_restore_default_timer_on_none() {
        let mut store = store(IoConfig::Io128Out, OutputDensity::Sixteen);
        store.set_timer(address(0, 0), NonZeroU32::new(5));
        assert_eq!(store.output(address(0, 0)).timer.get(), 5);
        store.set_timer(address(0, 0), None);
        assert_eq!(store.output(address(0, 0)).timer, DEFAULT_TIMER_SECS);
    }

    #[test]
    fn should_interlock_partner_pin_and_clear_it() {
        let mut store = store(IoConfig::Io128Out, OutputDensity::Sixteen);
        store.set_interlock(address(2, 0), Some(1));
        assert_eq!(store.output(address(2, 0)).interlock_partner(0), Some(1));
        assert_eq!(store.output(address(3, 0)).interlock_partner(0), None);
        store.set_interlock(address(2, 0), None);
        assert_eq!(store.output(address(2, 0)).interlock_partner(0), None);
    }

    #[test]
    fn should_apply_default_input_type_to_input_devices_only() {
        let mut store = store(IoConfig::Io64In64Out, OutputDensity::Sixteen);
        store.apply_default_input_type(InputType::Contact);
        assert_eq!(store.input(address(3, 15)).input_type, InputType::Contact);
        assert_eq!(store.input(address(4, 0)).input_type, InputType::Switch);
        assert_eq!(store.display.pin_types.len(), 64);
    }

    #[test]
    fn should_apply_default_output_type_over_addressable_pins() {
        let mut store = store(IoConfig::Io64In64Out, OutputDensity::Eight);
        store.apply_default_output_type(OutputType::Motor);
        assert_eq!(store.output(address(4, 7)).output_type, OutputType::Motor);
        assert_eq!(store.output(address(4, 8)).output_type, OutputType::Relay);
        assert_eq!(store.output(address(3, 0)).output_type, OutputType::Relay);
    }
}
