//! Event translator: turns pin events into published status payloads.
//!
//! Publishing is attempted once. When the publisher fails, the serialized
//! payload is written to the `stateio::failover` log target instead; there
//! are no retries.

use serde_json::Value;

use stateio_domain::event::{InputPinEvent, InputStatus, OutputPinEvent, OutputStatus, PinEvent};
use stateio_domain::layout::PartitionModel;

use crate::ports::StatusPublisher;

/// Log target receiving payloads that could not be published.
pub const FAILOVER_TARGET: &str = "stateio::failover";

/// What happened to a status payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Handed to the publisher.
    Published,
    /// The publisher failed; the payload went to the failover log.
    Failover(String),
    /// The pin doesn't belong to the bank the event claims, nothing was sent.
    Dropped,
}

/// Renders and publishes status payloads.
pub struct EventTranslator<P> {
    model: PartitionModel,
    publisher: P,
}

impl<P: StatusPublisher> EventTranslator<P> {
    pub const fn new(model: PartitionModel, publisher: P) -> Self {
        Self { model, publisher }
    }

    pub const fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        &mut self.publisher
    }

    /// Status of an input event, `None` if the pin isn't an input.
    #[must_use]
    pub fn input_status(&self, event: &InputPinEvent) -> Option<InputStatus> {
        let index = self.model.input_index(event.address)?;
        Some(InputStatus::new(index, event.input_type, event.state))
    }

    /// Status of an output event, `None` if the pin isn't an addressable output.
    #[must_use]
    pub fn output_status(&self, event: &OutputPinEvent) -> Option<OutputStatus> {
        let index = self.model.output_index(event.address)?;
        Some(OutputStatus::new(index, event.output_type, event.level))
    }

    /// Status payload of any pin event.
    #[must_use]
    pub fn render(&self, event: &PinEvent) -> Option<Value> {
        let payload = match event {
            PinEvent::Input(event) => serde_json::to_value(self.input_status(event)?),
            PinEvent::Output(event) => serde_json::to_value(self.output_status(event)?),
        };
        payload.ok()
    }

    /// Render and publish `event`, falling back to the failover log.
    pub fn dispatch(&mut self, event: &PinEvent) -> Delivery {
        let Some(payload) = self.render(event) else {
            tracing::warn!(address = %event.address(), "event from pin outside its bank dropped");
            return Delivery::Dropped;
        };
        match self.publisher.publish_status(&payload) {
            Ok(()) => Delivery::Published,
            Err(err) => {
                let serialized = payload.to_string();
                tracing::warn!(target: FAILOVER_TARGET, error = %err, payload = %serialized, "[failover]");
                Delivery::Failover(serialized)
            }
        }
    }
}
