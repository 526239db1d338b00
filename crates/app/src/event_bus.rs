//! In-process event queue between the pin engines and the runtime.

use std::collections::VecDeque;

use stateio_domain::event::PinEvent;

/// FIFO of pin events raised during one loop iteration.
///
/// Collaborators push onto it; the runtime drains it right after each call,
/// so events are published in the order they were raised.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<PinEvent>,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: PinEvent) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = PinEvent> + '_ {
        self.events.drain(..)
    }
}
