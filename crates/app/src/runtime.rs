//! The cooperative runtime: boot sequence, message handling and polling.
//!
//! Everything runs on one thread, one step at a time: inbound messages are
//! handled synchronously in arrival order and [`Runtime::poll`] services every
//! present device once per call. Pin events raised by the collaborators are
//! queued on an [`EventQueue`] and dispatched right after the call that raised
//! them.

use serde_json::Value;

use stateio_domain::addressing::PinAddress;
use stateio_domain::device::{DeviceId, DevicePresence, PINS_PER_DEVICE, Role};
use stateio_domain::error::StateIoError;
use stateio_domain::event::{OutputLevel, OutputPinEvent, PinEvent};
use stateio_domain::layout::{LayoutSettings, PartitionModel};
use stateio_domain::message::{CommandMessage, ConfigMessage};
use stateio_domain::schema::Schemas;

use crate::event_bus::EventQueue;
use crate::ports::{
    DisplayHints, ExpanderBus, InputClassifier, OutputExecutor, PinMode, SettingsStore,
    StatusPublisher,
};
use crate::services::config_service::{ConfigReport, ConfigService};
use crate::services::config_store::ChannelConfigStore;
use crate::services::event_translator::EventTranslator;
use crate::services::output_coordinator::{OutputCoordinator, RoutedCommand};

/// Collaborators handed to [`Runtime::boot`].
pub struct RuntimeParts<B, I, O, P, D, S> {
    pub bus: B,
    pub classifier: I,
    pub executor: O,
    pub publisher: P,
    pub display: D,
    pub settings: S,
}

/// Outcome of handling one command message.
#[derive(Debug, Default)]
pub struct CommandReport {
    /// Number of commands executed.
    pub applied: usize,
    /// Commands that were skipped, in message order.
    pub rejected: Vec<StateIoError>,
}

impl CommandReport {
    fn reject(&mut self, err: impl Into<StateIoError>) {
        let err = err.into();
        tracing::warn!(error = %err, detail = ?err, "command rejected");
        self.rejected.push(err);
    }
}

/// The booted system: sealed partition, channel configuration and collaborators.
pub struct Runtime<B, I, O, P, D, S> {
    model: PartitionModel,
    schemas: Schemas,
    bus: B,
    classifier: I,
    executor: O,
    coordinator: OutputCoordinator,
    translator: EventTranslator<P>,
    store: ChannelConfigStore<D>,
    config: ConfigService<S>,
    queue: EventQueue,
}

impl<B, I, O, P, D, S> Runtime<B, I, O, P, D, S>
where
    B: ExpanderBus,
    I: InputClassifier,
    O: OutputExecutor,
    P: StatusPublisher,
    D: DisplayHints,
    S: SettingsStore,
{
    /// Scan the bus, seal the partition and prepare every present device.
    ///
    /// Nothing here is fatal: unreadable settings fall back to the defaults
    /// and devices that fail to configure are logged and kept.
    #[tracing::instrument(skip_all)]
    pub fn boot(parts: RuntimeParts<B, I, O, P, D, S>) -> Self {
        let RuntimeParts {
            mut bus,
            classifier,
            executor,
            publisher,
            mut display,
            mut settings,
        } = parts;

        let presence = DevicePresence::probe(|device| bus.probe(device.bus_address()));
        let layout = match settings.load() {
            Ok(Some(layout)) => layout,
            Ok(None) => LayoutSettings::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load layout settings, using defaults");
                LayoutSettings::default()
            }
        };
        let model = PartitionModel::seal(layout, presence);

        for device in model.presence().iter() {
            if let Err(err) = prepare_device(&mut bus, &model, device) {
                tracing::warn!(%device, error = %err, "failed to configure device");
            }
        }
        display.set_port_layout(&model);

        let schemas = Schemas::generate(&model);
        tracing::info!(
            io_config = %model.io_config(),
            outputs_per_device = model.density().pins(),
            present = presence.bits(),
            inputs = ?model.input_range().map(|r| (r.first().get(), r.last().get())),
            outputs = ?model.output_range().map(|r| (r.first().get(), r.last().get())),
            "booted"
        );

        Self {
            model,
            schemas,
            bus,
            classifier,
            executor,
            coordinator: OutputCoordinator::new(model),
            translator: EventTranslator::new(model, publisher),
            store: ChannelConfigStore::new(model, display),
            config: ConfigService::new(model, settings),
            queue: EventQueue::new(),
        }
    }

    #[must_use]
    pub const fn model(&self) -> &PartitionModel {
        &self.model
    }

    #[must_use]
    pub const fn schemas(&self) -> &Schemas {
        &self.schemas
    }

    #[must_use]
    pub const fn store(&self) -> &ChannelConfigStore<D> {
        &self.store
    }

    #[must_use]
    pub const fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    #[must_use]
    pub const fn publisher(&self) -> &P {
        self.translator.publisher()
    }

    pub fn publisher_mut(&mut self) -> &mut P {
        self.translator.publisher_mut()
    }

    #[must_use]
    pub const fn settings(&self) -> &S {
        self.config.settings()
    }

    /// Apply a configuration message.
    #[tracing::instrument(skip_all)]
    pub fn handle_config(&mut self, json: &Value) -> ConfigReport {
        match ConfigMessage::parse(json) {
            Ok(parsed) => {
                let mut report = ConfigReport::default();
                for err in parsed.rejected {
                    report.reject(err);
                }
                report.merge(self.config.apply(&mut self.store, &parsed.message));
                report
            }
            Err(err) => {
                let mut report = ConfigReport::default();
                report.reject(err);
                report
            }
        }
    }

    /// Execute a command message.
    #[tracing::instrument(skip_all)]
    pub fn handle_command(&mut self, json: &Value) -> CommandReport {
        let mut report = CommandReport::default();
        let parsed = match CommandMessage::parse(json) {
            Ok(parsed) => parsed,
            Err(err) => {
                report.reject(err);
                return report;
            }
        };
        for err in parsed.rejected {
            report.reject(err);
        }

        for entry in &parsed.message.outputs {
            match self.coordinator.route(&self.store, entry) {
                Ok(RoutedCommand::Query {
                    address,
                    output_type,
                }) => match self.bus.read_pin(address) {
                    Ok(level) => {
                        let event = PinEvent::Output(OutputPinEvent {
                            address,
                            output_type,
                            level,
                        });
                        self.translator.dispatch(&event);
                        report.applied += 1;
                    }
                    Err(err) => report.reject(err),
                },
                Ok(RoutedCommand::Switch { address, command }) => {
                    self.executor.handle_command(
                        address,
                        command,
                        self.store.outputs(address.device),
                        &mut self.queue,
                    );
                    self.dispatch_queued();
                    report.applied += 1;
                }
                Err(err) => report.reject(err),
            }
        }
        report
    }

    /// Service every present device once, in ascending order.
    ///
    /// Returns the number of pin events dispatched.
    pub fn poll(&mut self) -> usize {
        let mut dispatched = 0;
        for device in self.model.presence().iter() {
            if self.model.is_output(device) {
                self.executor
                    .process(device, self.store.outputs(device), &mut self.queue);
                dispatched += self.dispatch_queued();
            }

            let pins = match self.bus.read_pins(device) {
                Ok(pins) => pins,
                Err(err) => {
                    tracing::warn!(%device, error = %err, "failed to read device");
                    continue;
                }
            };
            self.store.display_mut().update_ports(device, pins);

            if self.model.is_input(device) {
                self.classifier
                    .process(device, pins, self.store.inputs(device), &mut self.queue);
                dispatched += self.dispatch_queued();
            }
        }
        dispatched
    }

    fn dispatch_queued(&mut self) -> usize {
        let mut dispatched = 0;
        for event in self.queue.drain() {
            if let PinEvent::Output(output) = event
                && let Err(err) = self.bus.write_pin(output.address, output.level)
            {
                tracing::warn!(address = %output.address, error = %err, "failed to drive output");
                continue;
            }
            self.translator.dispatch(&event);
            dispatched += 1;
        }
        dispatched
    }
}

fn prepare_device<B: ExpanderBus>(
    bus: &mut B,
    model: &PartitionModel,
    device: DeviceId,
) -> Result<(), StateIoError> {
    match model.role(device) {
        Role::Input => bus.configure(device, PinMode::Input),
        Role::Output => {
            bus.configure(device, PinMode::Output)?;
            for pin in 0..PINS_PER_DEVICE {
                if let Some(address) = PinAddress::new(device, pin) {
                    bus.write_pin(address, OutputLevel::Off)?;
                }
            }
            Ok(())
        }
    }
}
