//! Channel addressing: logical index ↔ `(device, pin)`.
//!
//! Indices are 1-based and unique within their bank. Input devices always use
//! the full 16-pin density; output devices use the partition's
//! [`OutputDensity`](crate::layout::OutputDensity). Every index arriving from
//! outside is untrusted, so the forward mapping rejects anything outside the
//! bank's range.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::{DeviceId, PINS_PER_DEVICE};
use crate::error::OutOfRangeError;
use crate::layout::{Bank, PartitionModel};

/// Number of inputs grouped under one display port.
pub const CHANNELS_PER_PORT: u16 = 4;

/// A flat, 1-based, user-facing channel number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelIndex(u16);

impl ChannelIndex {
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ChannelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A physical pin on one expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinAddress {
    pub device: DeviceId,
    pub pin: u8,
}

impl PinAddress {
    /// Create an address, returning `None` for pins past the chip's 16.
    #[must_use]
    pub const fn new(device: DeviceId, pin: u8) -> Option<Self> {
        if pin < PINS_PER_DEVICE {
            Some(Self { device, pin })
        } else {
            None
        }
    }
}

impl fmt::Display for PinAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device {} pin {}", self.device, self.pin)
    }
}

/// Display grouping of an input index: four channels per port, all 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortChannel {
    pub port: u16,
    pub channel: u16,
}

impl PortChannel {
    /// Group `index` into its port and the channel within that port.
    #[must_use]
    pub const fn of(index: ChannelIndex) -> Self {
        let port = (index.0 - 1) / CHANNELS_PER_PORT + 1;
        Self {
            port,
            channel: index.0 - (port - 1) * CHANNELS_PER_PORT,
        }
    }
}

impl PartitionModel {
    /// Resolve an input index to its pin.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when the input bank is empty or the index
    /// lies outside it.
    pub fn input_address(&self, index: ChannelIndex) -> Result<PinAddress, OutOfRangeError> {
        self.check(Bank::Input, index)?;
        let offset = index.0 - 1;
        let pins = u16::from(PINS_PER_DEVICE);
        address(offset / pins, offset % pins).ok_or(OutOfRangeError {
            bank: Bank::Input,
            index,
        })
    }

    /// Resolve an output index to its pin.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when the output bank is empty or the index
    /// lies outside it.
    pub fn output_address(&self, index: ChannelIndex) -> Result<PinAddress, OutOfRangeError> {
        self.check(Bank::Output, index)?;
        let offset = index.0 - self.min_output_index().0;
        let pins = u16::from(self.density().pins());
        address(offset / pins + u16::from(self.split_point()), offset % pins).ok_or(
            OutOfRangeError {
                bank: Bank::Output,
                index,
            },
        )
    }

    /// Resolve an index of either bank.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] when the index is outside `bank`.
    pub fn resolve(&self, bank: Bank, index: ChannelIndex) -> Result<PinAddress, OutOfRangeError> {
        match bank {
            Bank::Input => self.input_address(index),
            Bank::Output => self.output_address(index),
        }
    }

    /// Logical index of an input pin (inverse of [`input_address`](Self::input_address)).
    ///
    /// Returns `None` when the pin does not belong to the input bank.
    #[must_use]
    pub fn input_index(&self, address: PinAddress) -> Option<ChannelIndex> {
        if !self.is_input(address.device) {
            return None;
        }
        let device = u16::from(address.device.get());
        Some(ChannelIndex(
            device * u16::from(PINS_PER_DEVICE) + u16::from(address.pin) + 1,
        ))
    }

    /// Logical index of an output pin (inverse of [`output_address`](Self::output_address)).
    ///
    /// Returns `None` when the pin does not belong to the output bank or lies
    /// past the configured density.
    #[must_use]
    pub fn output_index(&self, address: PinAddress) -> Option<ChannelIndex> {
        if !self.is_output(address.device) || address.pin >= self.density().pins() {
            return None;
        }
        let device = u16::from(address.device.get() - self.split_point());
        Some(ChannelIndex(
            device * u16::from(self.density().pins())
                + u16::from(address.pin)
                + self.min_output_index().0,
        ))
    }

    fn check(&self, bank: Bank, index: ChannelIndex) -> Result<(), OutOfRangeError> {
        match self.range(bank) {
            Some(range) if range.contains(index) => Ok(()),
            _ => Err(OutOfRangeError { bank, index }),
        }
    }
}

fn address(device: u16, pin: u16) -> Option<PinAddress> {
    let device = DeviceId::new(u8::try_from(device).ok()?)?;
    PinAddress::new(device, u8::try_from(pin).ok()?)
}
