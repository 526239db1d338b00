//! Display port: optional front-panel hints.
//!
//! Every method is best-effort and defaults to doing nothing, so a system
//! without a display uses [`NoDisplay`].

use stateio_domain::addressing::PinAddress;
use stateio_domain::device::DeviceId;
use stateio_domain::layout::PartitionModel;

/// How a pin is drawn on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPinType {
    Default,
    Security,
}

/// Hints forwarded to an attached display.
pub trait DisplayHints {
    /// Announce the partition once it is sealed.
    fn set_port_layout(&mut self, _model: &PartitionModel) {}

    fn set_pin_type(&mut self, _address: PinAddress, _pin_type: DisplayPinType) {}

    fn set_pin_invert(&mut self, _address: PinAddress, _invert: bool) {}

    fn set_pin_disabled(&mut self, _address: PinAddress, _disabled: bool) {}

    /// Latest raw pin levels of `device`.
    fn update_ports(&mut self, _device: DeviceId, _pins: u16) {}
}

/// No display attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDisplay;

impl DisplayHints for NoDisplay {}
