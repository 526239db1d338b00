//! Output coordinator: validates output configuration and commands against
//! the partition and the stored channel configuration.

use stateio_domain::addressing::PinAddress;
use stateio_domain::channel::{OutputCommand, OutputType};
use stateio_domain::error::{RejectedError, StateIoError};
use stateio_domain::layout::PartitionModel;
use stateio_domain::message::{OutputCommandEntry, OutputConfigEntry};

use super::config_store::ChannelConfigStore;
use crate::ports::{DisplayHints, SwitchCommand};

/// A validated output command, ready to be executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutedCommand {
    /// Report the current level without changing it.
    Query {
        address: PinAddress,
        output_type: OutputType,
    },
    /// Hand over to the output executor.
    Switch {
        address: PinAddress,
        command: SwitchCommand,
    },
}

/// Routes output configuration entries and commands to pins.
#[derive(Debug, Clone, Copy)]
pub struct OutputCoordinator {
    model: PartitionModel,
}

impl OutputCoordinator {
    #[must_use]
    pub const fn new(model: PartitionModel) -> Self {
        Self { model }
    }

    /// Apply one `outputs` entry of a configuration message.
    ///
    /// The entry is validated as a whole first; a rejected entry leaves the
    /// store untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::OutOfRange`] when the index or the interlock
    /// index is outside the output bank, or
    /// [`RejectedError::CrossDeviceInterlock`] when the interlock partner lives
    /// on another device.
    #[tracing::instrument(skip(self, store), fields(index = %entry.index))]
    pub fn configure<D: DisplayHints>(
        &self,
        store: &mut ChannelConfigStore<D>,
        entry: &OutputConfigEntry,
    ) -> Result<PinAddress, StateIoError> {
        let address = self.model.output_address(entry.index)?;
        let interlock = match entry.interlock_index {
            Some(Some(partner)) => {
                let partner_address = self.model.output_address(partner)?;
                if partner_address.device != address.device {
                    return Err(RejectedError::CrossDeviceInterlock {
                        index: entry.index,
                        partner,
                    }
                    .into());
                }
                Some(Some(partner_address.pin))
            }
            Some(None) => Some(None),
            None => None,
        };

        if let Some(output_type) = entry.output_type {
            store.set_output_type(address, output_type);
        }
        if let Some(seconds) = entry.timer_seconds {
            store.set_timer(address, seconds);
        }
        if let Some(partner_pin) = interlock {
            store.set_interlock(address, partner_pin);
        }
        tracing::debug!(%address, "output configured");
        Ok(address)
    }

    /// Validate one `outputs` entry of a command message.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::OutOfRange`] when the index is outside the
    /// output bank, or [`RejectedError::TypeMismatch`] when the asserted type
    /// differs from the configured one.
    #[tracing::instrument(skip(self, store), fields(index = %entry.index))]
    pub fn route<D: DisplayHints>(
        &self,
        store: &ChannelConfigStore<D>,
        entry: &OutputCommandEntry,
    ) -> Result<RoutedCommand, StateIoError> {
        let address = self.model.output_address(entry.index)?;
        let configured = store.output(address).output_type;
        if let Some(requested) = entry.output_type
            && requested != configured
        {
            return Err(RejectedError::TypeMismatch {
                index: entry.index,
                configured,
                requested,
            }
            .into());
        }
        Ok(match entry.command() {
            OutputCommand::Query => RoutedCommand::Query {
                address,
                output_type: configured,
            },
            OutputCommand::On => RoutedCommand::Switch {
                address,
                command: SwitchCommand::On,
            },
            OutputCommand::Off => RoutedCommand::Switch {
                address,
                command: SwitchCommand::Off,
            },
        })
    }
}
