//! Device: one I/O expander chip on the shared bus.
//!
//! Up to [`DEVICE_COUNT`] expanders live at fixed, consecutive bus addresses.
//! Which of them answered the boot-time probe is recorded once in a
//! [`DevicePresence`] set and never changes afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of expander slots on the bus.
pub const DEVICE_COUNT: u8 = 8;

/// Number of I/O pins on every expander.
pub const PINS_PER_DEVICE: u8 = 16;

/// Fixed bus address of each expander slot, indexed by [`DeviceId`].
pub const BUS_ADDRESSES: [u8; DEVICE_COUNT as usize] =
    [0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27];

/// Position of an expander on the bus (`0..8`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DeviceId(u8);

impl DeviceId {
    /// Create a device id, returning `None` when `id >= DEVICE_COUNT`.
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if id < DEVICE_COUNT {
            Some(Self(id))
        } else {
            None
        }
    }

    /// Iterate over every slot in ascending bus order.
    pub fn all() -> impl DoubleEndedIterator<Item = Self> {
        (0..DEVICE_COUNT).map(Self)
    }

    /// Raw slot number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Slot number as an array index.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Bus address this slot answers on.
    #[must_use]
    pub const fn bus_address(self) -> u8 {
        BUS_ADDRESSES[self.0 as usize]
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<u8> for DeviceId {
    type Error = InvalidDeviceId;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidDeviceId(value))
    }
}

impl From<DeviceId> for u8 {
    fn from(value: DeviceId) -> Self {
        value.0
    }
}

/// A device slot number outside `0..DEVICE_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("device id {0} is out of range (0..{DEVICE_COUNT})")]
pub struct InvalidDeviceId(pub u8);

/// Bank a device belongs to under the current partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Input,
    Output,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Set of expanders that answered the boot probe, one bit per slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DevicePresence(u8);

impl DevicePresence {
    /// No device present.
    pub const NONE: Self = Self(0);

    /// All eight devices present.
    pub const ALL: Self = Self(u8::MAX);

    /// Build from the raw bitmap (bit `n` set = device `n` present).
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Build by probing every slot in bus order.
    pub fn probe(mut answers: impl FnMut(DeviceId) -> bool) -> Self {
        DeviceId::all()
            .filter(|&device| answers(device))
            .fold(Self::NONE, |acc, device| acc.with(device))
    }

    /// Return a copy with `device` marked present.
    #[must_use]
    pub const fn with(self, device: DeviceId) -> Self {
        Self(self.0 | (1 << device.0))
    }

    /// Raw bitmap.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, device: DeviceId) -> bool {
        self.0 & (1 << device.0) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Present devices in ascending bus order.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = DeviceId> {
        DeviceId::all().filter(move |&device| self.contains(device))
    }
}

impl FromIterator<DeviceId> for DevicePresence {
    fn from_iter<I: IntoIterator<Item = DeviceId>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}
