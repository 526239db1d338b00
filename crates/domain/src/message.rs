//! Inbound configuration and command messages.
//!
//! Messages arrive as loosely structured JSON. Each top-level key and each
//! array entry is decoded on its own: a bad key or entry is collected as a
//! [`MessageError`] in [`Parsed::rejected`] and the rest of the message still
//! applies. Nothing that failed to decode ever reaches the channel store.

use std::num::NonZeroU32;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::addressing::ChannelIndex;
use crate::channel::{InputType, OutputCommand, OutputType};
use crate::error::MessageError;
use crate::layout::{IoConfig, LayoutSettings, OutputDensity};

/// A decoded message together with the parts that were rejected.
#[derive(Debug)]
pub struct Parsed<T> {
    pub message: T,
    pub rejected: Vec<MessageError>,
}

/// Layout keys of a configuration message; they only take effect on restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutUpdate {
    pub io_config: Option<IoConfig>,
    pub outputs_per_device: Option<OutputDensity>,
}

impl LayoutUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.io_config.is_none() && self.outputs_per_device.is_none()
    }

    /// Overlay the update on `settings`.
    #[must_use]
    pub fn apply_to(self, settings: LayoutSettings) -> LayoutSettings {
        LayoutSettings {
            io_config: self.io_config.unwrap_or(settings.io_config),
            outputs_per_device: self
                .outputs_per_device
                .unwrap_or(settings.outputs_per_device),
        }
    }
}

/// One entry of the `inputs` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct InputConfigEntry {
    pub index: ChannelIndex,
    #[serde(default, rename = "type")]
    pub input_type: Option<InputType>,
    #[serde(default)]
    pub invert: Option<bool>,
    #[serde(default)]
    pub disabled: Option<bool>,
}

/// One entry of the `outputs` array of a configuration message.
///
/// The outer `Option` of `timer_seconds` / `interlock_index` records whether
/// the key was present at all; an inner `None` is an explicit `null`, which
/// resets the setting to its default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfigEntry {
    pub index: ChannelIndex,
    #[serde(default, rename = "type")]
    pub output_type: Option<OutputType>,
    #[serde(default, deserialize_with = "nullable")]
    pub timer_seconds: Option<Option<NonZeroU32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub interlock_index: Option<Option<ChannelIndex>>,
}

/// One entry of the `outputs` array of a command message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OutputCommandEntry {
    pub index: ChannelIndex,
    #[serde(default, rename = "type")]
    pub output_type: Option<OutputType>,
    /// Required key; `null` means [`OutputCommand::Query`].
    #[serde(deserialize_with = "Option::deserialize")]
    command: Option<OutputCommand>,
}

impl OutputCommandEntry {
    #[must_use]
    pub const fn new(index: ChannelIndex, command: OutputCommand) -> Self {
        Self {
            index,
            output_type: None,
            command: Some(command),
        }
    }

    #[must_use]
    pub const fn asserting(mut self, output_type: OutputType) -> Self {
        self.output_type = Some(output_type);
        self
    }

    /// The requested command, with `null` read as a query.
    #[must_use]
    pub fn command(&self) -> OutputCommand {
        self.command.unwrap_or(OutputCommand::Query)
    }
}

/// A bulk configuration message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigMessage {
    pub layout: LayoutUpdate,
    pub default_input_type: Option<InputType>,
    pub inputs: Vec<InputConfigEntry>,
    pub default_output_type: Option<OutputType>,
    pub outputs: Vec<OutputConfigEntry>,
}

impl ConfigMessage {
    /// Decode a configuration message key by key.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::NotAnObject`] when `json` is not an object.
    pub fn parse(json: &Value) -> Result<Parsed<Self>, MessageError> {
        let object = json.as_object().ok_or(MessageError::NotAnObject)?;
        let mut rejected = Vec::new();
        let message = Self {
            layout: LayoutUpdate {
                io_config: field(object, "ioConfig", &mut rejected),
                outputs_per_device: field(object, "outputsPerMcp", &mut rejected),
            },
            default_input_type: field(object, "defaultInputType", &mut rejected),
            inputs: entries(object, "inputs", &mut rejected),
            default_output_type: field(object, "defaultOutputType", &mut rejected),
            outputs: entries(object, "outputs", &mut rejected),
        };
        Ok(Parsed { message, rejected })
    }
}

/// A command message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandMessage {
    pub outputs: Vec<OutputCommandEntry>,
}

impl CommandMessage {
    /// Decode a command message entry by entry.
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::NotAnObject`] when `json` is not an object.
    pub fn parse(json: &Value) -> Result<Parsed<Self>, MessageError> {
        let object = json.as_object().ok_or(MessageError::NotAnObject)?;
        let mut rejected = Vec::new();
        let outputs = entries(object, "outputs", &mut rejected);
        Ok(Parsed {
            message: Self { outputs },
            rejected,
        })
    }
}

fn field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &'static str,
    rejected: &mut Vec<MessageError>,
) -> Option<T> {
    let value = object.get(key)?;
    T::deserialize(value)
        .map_err(|source| rejected.push(MessageError::InvalidField { key, source }))
        .ok()
}

fn entries<T: DeserializeOwned>(
    object: &Map<String, Value>,
    key: &'static str,
    rejected: &mut Vec<MessageError>,
) -> Vec<T> {
    let Some(items) = field::<Vec<Value>>(object, key, rejected) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| {
            T::deserialize(item)
                .map_err(|source| {
                    rejected.push(MessageError::InvalidEntry {
                        key,
                        position,
                        source,
                    });
                })
                .ok()
        })
        .collect()
}

fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
