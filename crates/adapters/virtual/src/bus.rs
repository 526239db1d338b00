//! In-memory expander bus.

use stateio_app::ports::{ExpanderBus, PinMode};
use stateio_domain::addressing::PinAddress;
use stateio_domain::device::{BUS_ADDRESSES, DEVICE_COUNT, DeviceId, DevicePresence};
use stateio_domain::error::StateIoError;
use stateio_domain::event::OutputLevel;

/// Errors raised by the virtual bus.
#[derive(Debug, thiserror::Error)]
pub enum VirtualBusError {
    /// Nothing answers at the device's bus address.
    #[error("no device at {0:#04x}")]
    Absent(u8),
    /// The pin was written before its device was configured as output.
    #[error("device {0} is not configured as output")]
    NotOutput(DeviceId),
}

impl VirtualBusError {
    /// Convert into the domain-level error type.
    #[must_use]
    pub fn into_domain(self) -> StateIoError {
        StateIoError::transport(self)
    }
}

/// Eight simulated 16-pin expanders.
#[derive(Debug, Clone)]
pub struct VirtualBus {
    present: DevicePresence,
    pins: [u16; DEVICE_COUNT as usize],
    modes: [Option<PinMode>; DEVICE_COUNT as usize],
}

impl VirtualBus {
    /// A bus where exactly the devices of `present` answer.
    #[must_use]
    pub fn new(present: DevicePresence) -> Self {
        Self {
            present,
            pins: [u16::MAX; DEVICE_COUNT as usize],
            modes: [None; DEVICE_COUNT as usize],
        }
    }

    /// Drive an input pin from the outside (`false` = pulled to ground).
    pub fn set_input_level(&mut self, address: PinAddress, high: bool) {
        let pins = &mut self.pins[address.device.as_usize()];
        if high {
            *pins |= 1 << address.pin;
        } else {
            *pins &= !(1 << address.pin);
        }
    }

    #[must_use]
    pub fn pins(&self, device: DeviceId) -> u16 {
        self.pins[device.as_usize()]
    }

    #[must_use]
    pub fn mode(&self, device: DeviceId) -> Option<PinMode> {
        self.modes[device.as_usize()]
    }

    #[must_use]
    pub fn level(&self, address: PinAddress) -> OutputLevel {
        OutputLevel::from(self.pins(address.device) & (1 << address.pin) != 0)
    }

    fn check(&self, device: DeviceId) -> Result<(), VirtualBusError> {
        if self.present.contains(device) {
            Ok(())
        } else {
            Err(VirtualBusError::Absent(device.bus_address()))
        }
    }
}

impl Default for VirtualBus {
    fn default() -> Self {
        Self::new(DevicePresence::ALL)
    }
}

impl ExpanderBus for VirtualBus {
    fn probe(&mut self, bus_address: u8) -> bool {
        BUS_ADDRESSES
            .iter()
            .zip(DeviceId::all())
            .any(|(&address, device)| address == bus_address && self.present.contains(device))
    }

    fn configure(&mut self, device: DeviceId, mode: PinMode) -> Result<(), StateIoError> {
        self.check(device).map_err(VirtualBusError::into_domain)?;
        self.modes[device.as_usize()] = Some(mode);
        tracing::debug!(%device, ?mode, "virtual device configured");
        Ok(())
    }

    fn read_pins(&mut self, device: DeviceId) -> Result<u16, StateIoError> {
        self.check(device).map_err(VirtualBusError::into_domain)?;
        Ok(self.pins[device.as_usize()])
    }

    fn write_pin(&mut self, address: PinAddress, level: OutputLevel) -> Result<(), StateIoError> {
        self.check(address.device)
            .map_err(VirtualBusError::into_domain)?;
        if self.mode(address.device) != Some(PinMode::Output) {
            return Err(VirtualBusError::NotOutput(address.device).into_domain());
        }
        let pins = &mut self.pins[address.device.as_usize()];
        if level.is_on() {
            *pins |= 1 << address.pin;
        } else {
            *pins &= !(1 << address.pin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(id: u8) -> DeviceId {
        DeviceId::new(id).unwrap()
    }

    #[test]
    fn should_answer_probe_only_for_present_devices() {
        let mut bus = VirtualBus::new([device(0), device(5)].into_iter().collect());
        assert!(bus.probe(0x20));
        assert!(bus.probe(0x25));
        assert!(!bus.probe(0x21));
        assert!(!bus.probe(0x40));
    }

    #[test]
    fn should_idle_inputs_high() {
        let mut bus = VirtualBus::default();
        assert_eq!(bus.read_pins(device(2)).unwrap(), u16::MAX);
    }

    #[test]
    fn should_reflect_external_input_levels() {
        let mut bus = VirtualBus::default();
        let address = PinAddress::new(device(1), 3).unwrap();
        bus.set_input_level(address, false);
        assert_eq!(bus.read_pins(device(1)).unwrap(), !(1 << 3));
        assert_eq!(bus.read_pin(address).unwrap(), OutputLevel::Off);
    }

    #[test]
    fn should_write_configured_outputs() {
        let mut bus = VirtualBus::default();
        bus.configure(device(4), PinMode::Output).unwrap();
        let address = PinAddress::new(device(4), 0).unwrap();
        bus.write_pin(address, OutputLevel::Off).unwrap();
        assert_eq!(bus.level(address), OutputLevel::Off);
        bus.write_pin(address, OutputLevel::On).unwrap();
        assert_eq!(bus.level(address), OutputLevel::On);
    }

    #[test]
    fn should_refuse_writes_to_inputs() {
        let mut bus = VirtualBus::default();
        bus.configure(device(0), PinMode::Input).unwrap();
        let address = PinAddress::new(device(0), 0).unwrap();
        assert!(matches!(
            bus.write_pin(address, OutputLevel::On),
            Err(StateIoError::Transport(_))
        ));
    }

    #[test]
    fn should_fail_on_absent_device() {
        let mut bus = VirtualBus::new(DevicePresence::NONE);
        let err = bus.read_pins(device(3)).unwrap_err();
        assert!(matches!(err, StateIoError::Transport(_)));
        assert_eq!(VirtualBusError::Absent(0x23).to_string(), "no device at 0x23");
    }
}
