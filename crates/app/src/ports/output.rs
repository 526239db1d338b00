//! Output executor port: switches outputs and runs their timers.

use stateio_domain::addressing::PinAddress;
use stateio_domain::channel::OutputConfig;
use stateio_domain::device::{DeviceId, PINS_PER_DEVICE};

use crate::event_bus::EventQueue;

/// A state-changing output command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchCommand {
    On,
    Off,
}

/// Per-device output engine.
///
/// The executor never touches the bus: it pushes
/// [`PinEvent::Output`](stateio_domain::event::PinEvent::Output) events and
/// the runtime drives the pin and publishes the status for each of them.
pub trait OutputExecutor {
    /// Apply `command` to the output at `address`, honouring its type,
    /// timer and interlock partner.
    fn handle_command(
        &mut self,
        address: PinAddress,
        command: SwitchCommand,
        configs: &[OutputConfig; PINS_PER_DEVICE as usize],
        events: &mut EventQueue,
    );

    /// Advance timers of `device`; called once per loop iteration.
    fn process(
        &mut self,
        device: DeviceId,
        configs: &[OutputConfig; PINS_PER_DEVICE as usize],
        events: &mut EventQueue,
    );
}
