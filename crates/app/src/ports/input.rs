//! Input classifier port: turns raw pin levels into input events.

use stateio_domain::channel::InputConfig;
use stateio_domain::device::{DeviceId, PINS_PER_DEVICE};

use crate::event_bus::EventQueue;

/// Per-device input engine (debounce, press counting, …).
///
/// The classifier owns all timing; the runtime only feeds it the latest pin
/// levels of each input device, once per loop iteration.
pub trait InputClassifier {
    /// Process one sample of `device` and push any resulting
    /// [`PinEvent::Input`](stateio_domain::event::PinEvent::Input) onto `events`.
    fn process(
        &mut self,
        device: DeviceId,
        pins: u16,
        configs: &[InputConfig; PINS_PER_DEVICE as usize],
        events: &mut EventQueue,
    );
}
