//! Partition model: how the device array is split into an input bank and an
//! output bank.
//!
//! The two layout settings ([`IoConfig`] and [`OutputDensity`]) are read once
//! at boot and combined with the probed [`DevicePresence`] into a sealed
//! [`PartitionModel`]. Nothing can change a model after construction; a new
//! layout only takes effect after a restart, because it moves every index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::addressing::ChannelIndex;
use crate::device::{DEVICE_COUNT, DeviceId, DevicePresence, PINS_PER_DEVICE, Role};
use crate::error::MessageError;
use crate::vocabulary::vocabulary;

vocabulary! {
    /// Partition of the 128 pins into input and output pins.
    #[derive(Default)]
    pub enum IoConfig("io config") {
        #[default]
        Io128In => "io_128_0",
        Io96In32Out => "io_96_32",
        Io64In64Out => "io_64_64",
        Io32In96Out => "io_32_96",
        Io128Out => "io_0_128",
    }
}

impl IoConfig {
    /// Index of the first output device; devices below it are inputs.
    #[must_use]
    pub const fn split_point(self) -> u8 {
        match self {
            Self::Io128In => 8,
            Self::Io96In32Out => 6,
            Self::Io64In64Out => 4,
            Self::Io32In96Out => 2,
            Self::Io128Out => 0,
        }
    }
}

/// Number of addressable output pins per output device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u8")]
pub enum OutputDensity {
    /// 8-channel relay drivers: only pins `0..8` are wired.
    Eight,
    /// Full 16-pin relay drivers.
    #[default]
    Sixteen,
}

impl OutputDensity {
    /// Pins per output device.
    #[must_use]
    pub const fn pins(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }
}

impl TryFrom<u64> for OutputDensity {
    type Error = MessageError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            8 => Ok(Self::Eight),
            16 => Ok(Self::Sixteen),
            other => Err(MessageError::InvalidDensity(other)),
        }
    }
}

impl From<OutputDensity> for u8 {
    fn from(value: OutputDensity) -> Self {
        value.pins()
    }
}

/// The persisted layout settings, as written by `ioConfig` / `outputsPerMcp`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    pub io_config: IoConfig,
    #[serde(rename = "outputsPerMcp")]
    pub outputs_per_device: OutputDensity,
}

/// One half of the logical channel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bank {
    Input,
    Output,
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

/// Inclusive, non-empty run of logical indices backed by present devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRange {
    first: ChannelIndex,
    last: ChannelIndex,
}

impl IndexRange {
    #[must_use]
    pub const fn first(self) -> ChannelIndex {
        self.first
    }

    #[must_use]
    pub const fn last(self) -> ChannelIndex {
        self.last
    }

    #[must_use]
    pub fn contains(self, index: ChannelIndex) -> bool {
        self.first <= index && index <= self.last
    }

    /// Number of indices in the range.
    #[must_use]
    pub fn len(self) -> usize {
        usize::from(self.last.get() - self.first.get()) + 1
    }

    /// Always `false`; an empty bank has no range at all.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }

    /// Every index of the range in ascending order.
    pub fn iter(self) -> impl DoubleEndedIterator<Item = ChannelIndex> {
        (self.first.get()..=self.last.get()).map(ChannelIndex::new)
    }
}

/// Sealed partition of the device array, fixed for the process lifetime.
///
/// Construct it once during boot with [`PartitionModel::seal`] and share it by
/// reference or copy; it exposes no way to change the split point or density.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionModel {
    io_config: IoConfig,
    density: OutputDensity,
    presence: DevicePresence,
}

impl PartitionModel {
    /// Combine the boot-time settings with the probed device presence.
    #[must_use]
    pub const fn seal(settings: LayoutSettings, presence: DevicePresence) -> Self {
        Self {
            io_config: settings.io_config,
            density: settings.outputs_per_device,
            presence,
        }
    }

    /// The settings this model was sealed with.
    #[must_use]
    pub const fn settings(&self) -> LayoutSettings {
        LayoutSettings {
            io_config: self.io_config,
            outputs_per_device: self.density,
        }
    }

    #[must_use]
    pub const fn io_config(&self) -> IoConfig {
        self.io_config
    }

    /// Index of the first output device.
    #[must_use]
    pub const fn split_point(&self) -> u8 {
        self.io_config.split_point()
    }

    #[must_use]
    pub const fn density(&self) -> OutputDensity {
        self.density
    }

    #[must_use]
    pub const fn presence(&self) -> DevicePresence {
        self.presence
    }

    #[must_use]
    pub const fn is_input(&self, device: DeviceId) -> bool {
        device.get() < self.split_point()
    }

    #[must_use]
    pub const fn is_output(&self, device: DeviceId) -> bool {
        !self.is_input(device)
    }

    #[must_use]
    pub const fn role(&self, device: DeviceId) -> Role {
        if self.is_input(device) {
            Role::Input
        } else {
            Role::Output
        }
    }

    /// Logically addressable pins of `device`: all 16 for inputs, the
    /// configured density for outputs.
    #[must_use]
    pub const fn addressable_pins(&self, device: DeviceId) -> u8 {
        match self.role(device) {
            Role::Input => PINS_PER_DEVICE,
            Role::Output => self.density.pins(),
        }
    }

    /// Present devices of the given role, in ascending bus order.
    pub fn devices(&self, role: Role) -> impl DoubleEndedIterator<Item = DeviceId> + '_ {
        self.presence
            .iter()
            .filter(move |&device| self.role(device) == role)
    }

    #[must_use]
    pub const fn min_input_index(&self) -> ChannelIndex {
        ChannelIndex::new(1)
    }

    /// Last index of the highest present input device, or
    /// [`min_input_index`](Self::min_input_index) when there is none.
    ///
    /// Prefer [`input_range`](Self::input_range), which reports an empty bank
    /// explicitly.
    #[must_use]
    pub fn max_input_index(&self) -> ChannelIndex {
        self.devices(Role::Input)
            .next_back()
            .map_or(self.min_input_index(), |device| {
                ChannelIndex::new((u16::from(device.get()) + 1) * u16::from(PINS_PER_DEVICE))
            })
    }

    #[must_use]
    pub const fn min_output_index(&self) -> ChannelIndex {
        ChannelIndex::new(self.split_point() as u16 * PINS_PER_DEVICE as u16 + 1)
    }

    /// Last index of the highest present output device, or
    /// [`min_output_index`](Self::min_output_index) when there is none.
    ///
    /// Prefer [`output_range`](Self::output_range), which reports an empty
    /// bank explicitly.
    #[must_use]
    pub fn max_output_index(&self) -> ChannelIndex {
        let min = self.min_output_index().get();
        self.devices(Role::Output)
            .next_back()
            .map_or(self.min_output_index(), |device| {
                let devices = u16::from(device.get() + 1 - self.split_point());
                ChannelIndex::new(devices * u16::from(self.density.pins()) + min - 1)
            })
    }

    /// Input indices, or `None` when no input device is present.
    #[must_use]
    pub fn input_range(&self) -> Option<IndexRange> {
        self.devices(Role::Input).next_back()?;
        Some(IndexRange {
            first: self.min_input_index(),
            last: self.max_input_index(),
        })
    }

    /// Output indices, or `None` when no output device is present.
    #[must_use]
    pub fn output_range(&self) -> Option<IndexRange> {
        self.devices(Role::Output).next_back()?;
        Some(IndexRange {
            first: self.min_output_index(),
            last: self.max_output_index(),
        })
    }

    /// Range of the given bank.
    #[must_use]
    pub fn range(&self, bank: Bank) -> Option<IndexRange> {
        match bank {
            Bank::Input => self.input_range(),
            Bank::Output => self.output_range(),
        }
    }

    /// Whether the partition assigns any device slot to the input bank,
    /// regardless of presence.
    #[must_use]
    pub const fn has_input_slots(&self) -> bool {
        self.split_point() > 0
    }

    /// Whether the partition assigns any device slot to the output bank,
    /// regardless of presence.
    #[must_use]
    pub const fn has_output_slots(&self) -> bool {
        self.split_point() < DEVICE_COUNT
    }
}
