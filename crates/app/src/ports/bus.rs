//! Expander bus port: the 8 × 16-pin I/O expanders.

use stateio_domain::addressing::PinAddress;
use stateio_domain::device::DeviceId;
use stateio_domain::error::StateIoError;
use stateio_domain::event::OutputLevel;

/// How every pin of a device is configured at boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// Inputs with the internal pull-up enabled.
    Input,
    /// Push-pull outputs.
    Output,
}

/// Access to the expander devices on the shared bus.
///
/// Implementations live in adapter crates (e.g. `adapter_virtual`).
pub trait ExpanderBus {
    /// Whether a device answers at `bus_address`.
    fn probe(&mut self, bus_address: u8) -> bool;

    /// Configure all 16 pins of `device`.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::Transport`] when the device does not acknowledge.
    fn configure(&mut self, device: DeviceId, mode: PinMode) -> Result<(), StateIoError>;

    /// Read all 16 pins of `device` as a bit mask (bit `n` is pin `n`).
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::Transport`] when the read fails.
    fn read_pins(&mut self, device: DeviceId) -> Result<u16, StateIoError>;

    /// Drive a single output pin.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::Transport`] when the write fails.
    fn write_pin(&mut self, address: PinAddress, level: OutputLevel) -> Result<(), StateIoError>;

    /// Read a single pin.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::Transport`] when the read fails.
    fn read_pin(&mut self, address: PinAddress) -> Result<OutputLevel, StateIoError> {
        let pins = self.read_pins(address.device)?;
        Ok(OutputLevel::from(pins & (1 << address.pin) != 0))
    }
}
