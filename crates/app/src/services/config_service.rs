//! Configuration service: applies configuration messages.
//!
//! Layout keys are persisted for the next boot and never touch the live
//! partition. Channel keys are applied in message order: default input type,
//! inputs, default output type, outputs, so explicit entries override the
//! defaults sent alongside them.

use stateio_domain::error::StateIoError;
use stateio_domain::layout::{LayoutSettings, PartitionModel};
use stateio_domain::message::{ConfigMessage, InputConfigEntry, LayoutUpdate};

use super::config_store::ChannelConfigStore;
use super::output_coordinator::OutputCoordinator;
use crate::ports::{DisplayHints, SettingsStore};

/// Outcome of applying one configuration message.
#[derive(Debug, Default)]
pub struct ConfigReport {
    /// Number of keys and entries that took effect.
    pub applied: usize,
    /// Everything that was skipped: decode failures first, then whatever the
    /// store refused, each group in message order.
    pub rejected: Vec<StateIoError>,
    /// Persisted layout settings differ from the running partition.
    pub restart_required: bool,
}

impl ConfigReport {
    /// Record a skipped key or entry.
    pub fn reject(&mut self, err: impl Into<StateIoError>) {
        let err = err.into();
        tracing::warn!(error = %err, detail = ?err, "configuration rejected");
        self.rejected.push(err);
    }

    /// Append the outcome of a later step; its rejections were already logged.
    pub fn merge(&mut self, other: Self) {
        self.applied += other.applied;
        self.rejected.extend(other.rejected);
        self.restart_required |= other.restart_required;
    }
}

/// Applies configuration messages to the channel store and the settings store.
pub struct ConfigService<S> {
    model: PartitionModel,
    coordinator: OutputCoordinator,
    settings: S,
}

impl<S: SettingsStore> ConfigService<S> {
    pub const fn new(model: PartitionModel, settings: S) -> Self {
        Self {
            model,
            coordinator: OutputCoordinator::new(model),
            settings,
        }
    }

    pub const fn settings(&self) -> &S {
        &self.settings
    }

    /// Apply `message`, skipping (and reporting) whatever is rejected.
    #[tracing::instrument(skip_all)]
    pub fn apply<D: DisplayHints>(
        &mut self,
        store: &mut ChannelConfigStore<D>,
        message: &ConfigMessage,
    ) -> ConfigReport {
        let mut report = ConfigReport::default();

        if !message.layout.is_empty() {
            self.persist_layout(message.layout, &mut report);
        }

        if let Some(input_type) = message.default_input_type {
            store.apply_default_input_type(input_type);
            report.applied += 1;
        }
        for entry in &message.inputs {
            match self.configure_input(store, entry) {
                Ok(()) => report.applied += 1,
                Err(err) => report.reject(err),
            }
        }

        if let Some(output_type) = message.default_output_type {
            store.apply_default_output_type(output_type);
            report.applied += 1;
        }
        for entry in &message.outputs {
            match self.coordinator.configure(store, entry) {
                Ok(_) => report.applied += 1,
                Err(err) => report.reject(err),
            }
        }

        report
    }

    fn persist_layout(&mut self, update: LayoutUpdate, report: &mut ConfigReport) {
        let current = match self.settings.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => self.model.settings(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load layout settings, using running layout");
                self.model.settings()
            }
        };
        let next: LayoutSettings = update.apply_to(current);
        if let Err(err) = self.settings.save(next) {
            report.reject(err);
            return;
        }
        report.applied += 1;
        report.restart_required = next != self.model.settings();
        if report.restart_required {
            tracing::warn!(
                io_config = %next.io_config,
                outputs_per_device = next.outputs_per_device.pins(),
                "layout saved, restart required before it takes effect"
            );
        }
    }

    fn configure_input<D: DisplayHints>(
        &self,
        store: &mut ChannelConfigStore<D>,
        entry: &InputConfigEntry,
    ) -> Result<(), StateIoError> {
        let address = self.model.input_address(entry.index)?;
        if let Some(input_type) = entry.input_type {
            store.set_input_type(address, input_type);
        }
        if let Some(invert) = entry.invert {
            store.set_input_invert(address, invert);
        }
        if let Some(disabled) = entry.disabled {
            store.set_input_disabled(address, disabled);
        }
        Ok(())
    }
}
