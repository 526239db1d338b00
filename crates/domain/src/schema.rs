//! Self-describing configuration and command schemas.
//!
//! Index bounds come live from the [`PartitionModel`]; enum lists come from
//! the vocabulary tables. A bank with no present device contributes nothing.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::channel::{InputType, OutputCommand, OutputType};
use crate::layout::{IndexRange, IoConfig, OutputDensity, PartitionModel};
use crate::vocabulary::Vocabulary;

const RESTART_HINT: &str = "A restart is required before changes take effect.";

/// Both schemas, regenerated whenever the partition changes (i.e. at boot).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schemas {
    pub config_schema: Value,
    pub command_schema: Value,
}

impl Schemas {
    #[must_use]
    pub fn generate(model: &PartitionModel) -> Self {
        Self {
            config_schema: config_schema(model),
            command_schema: command_schema(model),
        }
    }
}

/// Properties accepted by a configuration message.
#[must_use]
pub fn config_schema(model: &PartitionModel) -> Value {
    let mut schema = Map::new();
    schema.insert(
        "ioConfig".into(),
        json!({
            "title": format!("Input/Output Partition ({RESTART_HINT})"),
            "description": "How the 128 expander pins are split between inputs and outputs.",
            "type": "string",
            "enum": IoConfig::NAMES,
        }),
    );
    schema.insert(
        "outputsPerMcp".into(),
        json!({
            "title": format!("Outputs Per Device ({RESTART_HINT})"),
            "description": "Number of outputs wired to each output expander, which depends on the relay driver (8 or 16, defaults to 16).",
            "type": "integer",
            "minimum": OutputDensity::Eight.pins(),
            "maximum": OutputDensity::Sixteen.pins(),
            "multipleOf": OutputDensity::Eight.pins(),
        }),
    );

    if let Some(range) = model.input_range() {
        schema.insert(
            "defaultInputType".into(),
            json!({
                "title": "Default Input Type",
                "description": "Type applied to every input without explicit configuration. Defaults to 'switch'.",
                "enum": InputType::NAMES,
            }),
        );
        schema.insert(
            "inputs".into(),
            array_of(
                "Input Configuration",
                "Configuration for each input in use. The 1-based index selects the input; the type defines how it is monitored and which events it emits. Inverting swaps the active state, disabling stops all events.",
                json!({
                    "index": index_property(range),
                    "type": {"title": "Type", "enum": InputType::NAMES},
                    "invert": {"title": "Invert", "type": "boolean"},
                    "disabled": {"title": "Disabled", "type": "boolean"},
                }),
                &["index"],
            ),
        );
    }

    if let Some(range) = model.output_range() {
        schema.insert(
            "defaultOutputType".into(),
            json!({
                "title": "Default Output Type",
                "description": "Type applied to every output without explicit configuration. Defaults to 'relay'.",
                "enum": OutputType::NAMES,
            }),
        );
        schema.insert(
            "outputs".into(),
            array_of(
                "Output Configuration",
                "Configuration for each output in use. The 1-based index selects the output; the type defines how it is driven. Timer outputs stay on for timerSeconds (defaults to 60). Interlocked outputs on the same device are never on at the same time.",
                json!({
                    "index": index_property(range),
                    "type": {"title": "Type", "enum": OutputType::NAMES},
                    "timerSeconds": {"title": "Timer (seconds)", "type": "integer", "minimum": 1},
                    "interlockIndex": {
                        "title": "Interlock With Index",
                        "type": "integer",
                        "minimum": range.first(),
                        "maximum": range.last(),
                    },
                }),
                &["index"],
            ),
        );
    }

    Value::Object(schema)
}

/// Properties accepted by a command message.
#[must_use]
pub fn command_schema(model: &PartitionModel) -> Value {
    let mut schema = Map::new();
    if let Some(range) = model.output_range() {
        schema.insert(
            "outputs".into(),
            array_of(
                "Output Commands",
                "Commands for one or more outputs. The 1-based index selects the output; the optional type must match its configuration. 'on' and 'off' change the output, 'query' publishes its current state.",
                json!({
                    "index": index_property(range),
                    "type": {"title": "Type", "enum": OutputType::NAMES},
                    "command": {"title": "Command", "type": "string", "enum": OutputCommand::NAMES},
                }),
                &["index", "command"],
            ),
        );
    }
    Value::Object(schema)
}

fn index_property(range: IndexRange) -> Value {
    json!({
        "title": "Index",
        "type": "integer",
        "minimum": range.first(),
        "maximum": range.last(),
    })
}

fn array_of(title: &str, description: &str, properties: Value, required: &[&str]) -> Value {
    json!({
        "title": title,
        "description": description,
        "type": "array",
        "items": {
            "type": "object",
            "properties": properties,
            "required": required,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceId, DevicePresence};
    use crate::layout::LayoutSettings;

    fn model(io_config: IoConfig, density: OutputDensity, presence: DevicePresence) -> PartitionModel {
        PartitionModel::seal(
            LayoutSettings {
                io_config,
                outputs_per_device: density,
            },
            presence,
        )
    }

    #[test]
    fn should_bound_indices_from_partition() {
        let m = model(IoConfig::Io64In64Out, OutputDensity::Eight, DevicePresence::ALL);
        let schema = config_schema(&m);
        let inputs = &schema["inputs"]["items"]["properties"]["index"];
        assert_eq!(inputs["minimum"], 1);
        assert_eq!(inputs["maximum"], 64);
        let outputs = &schema["outputs"]["items"]["properties"];
        assert_eq!(outputs["index"]["minimum"], 65);
        assert_eq!(outputs["index"]["maximum"], 96);
        assert_eq!(outputs["interlockIndex"]["maximum"], 96);
    }

    #[test]
    fn should_always_offer_layout_keys() {
        let m = model(IoConfig::Io128In, OutputDensity::Sixteen, DevicePresence::NONE);
        let schema = config_schema(&m);
        assert_eq!(
            schema["ioConfig"]["enum"],
            json!(["io_128_0", "io_96_32", "io_64_64", "io_32_96", "io_0_128"])
        );
        assert_eq!(schema["outputsPerMcp"]["multipleOf"], 8);
        assert!(schema.get("inputs").is_none());
        assert!(schema.get("outputs").is_none());
    }

    #[test]
    fn should_omit_input_section_when_all_outputs() {
        let m = model(IoConfig::Io128Out, OutputDensity::Sixteen, DevicePresence::ALL);
        let schema = config_schema(&m);
        assert!(schema.get("defaultInputType").is_none());
        assert!(schema.get("inputs").is_none());
        assert_eq!(schema["outputs"]["items"]["properties"]["index"]["minimum"], 1);
    }

    #[test]
    fn should_omit_output_sections_when_all_inputs() {
        let m = model(IoConfig::Io128In, OutputDensity::Sixteen, DevicePresence::ALL);
        assert!(config_schema(&m).get("outputs").is_none());
        assert_eq!(command_schema(&m), json!({}));
    }

    #[test]
    fn should_omit_bank_without_present_device() {
        let presence: DevicePresence = [DeviceId::new(5).unwrap()].into_iter().collect();
        let m = model(IoConfig::Io64In64Out, OutputDensity::Sixteen, presence);
        let schema = config_schema(&m);
        assert!(schema.get("inputs").is_none());
        assert_eq!(schema["outputs"]["items"]["properties"]["index"]["maximum"], 96);
    }

    #[test]
    fn should_require_index_and_command_in_command_schema() {
        let m = model(IoConfig::Io64In64Out, OutputDensity::Sixteen, DevicePresence::ALL);
        let schema = command_schema(&m);
        let items = &schema["outputs"]["items"];
        assert_eq!(items["required"], json!(["index", "command"]));
        assert_eq!(
            items["properties"]["command"]["enum"],
            json!(["query", "on", "off"])
        );
        assert_eq!(items["properties"]["type"]["enum"], json!(["relay", "motor", "timer"]));
    }

    #[test]
    fn should_list_input_types_from_vocabulary() {
        let m = model(IoConfig::Io128In, OutputDensity::Sixteen, DevicePresence::ALL);
        let schema = config_schema(&m);
        assert_eq!(
            schema["defaultInputType"]["enum"],
            json!(["button", "contact", "press", "rotary", "security", "switch", "toggle"])
        );
    }

    #[test]
    fn should_serialize_both_schemas_together() {
        let m = model(IoConfig::Io64In64Out, OutputDensity::Sixteen, DevicePresence::ALL);
        let value = serde_json::to_value(Schemas::generate(&m)).unwrap();
        assert!(value["configSchema"]["inputs"].is_object());
        assert!(value["commandSchema"]["outputs"].is_object());
    }
}
