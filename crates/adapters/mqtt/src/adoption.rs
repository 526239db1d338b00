//! Adoption payload announcing the firmware and its schemas.

use serde::Serialize;
use serde_json::{Value, json};

use stateio_domain::schema::Schemas;

const JSON_SCHEMA: &str = "http://json-schema.org/draft-07/schema#";

/// Identity of the running firmware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Firmware {
    pub name: String,
    pub short_name: String,
    pub maker: String,
    pub version: String,
}

/// Retained payload published on the `adopt` topic after each connect.
#[must_use]
pub fn adoption_payload(firmware: &Firmware, schemas: &Schemas) -> Value {
    json!({
        "firmware": firmware,
        "configSchema": object_schema(&format!("{} Config", firmware.short_name), &schemas.config_schema),
        "commandSchema": object_schema(&format!("{} Command", firmware.short_name), &schemas.command_schema),
    })
}

fn object_schema(title: &str, properties: &Value) -> Value {
    json!({
        "$schema": JSON_SCHEMA,
        "title": title,
        "type": "object",
        "properties": properties,
    })
}
