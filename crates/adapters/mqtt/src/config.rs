//! MQTT connection configuration.

use serde::Deserialize;

/// Configuration for the MQTT link.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Connect to a broker at all; without it status goes to the failover log.
    pub enabled: bool,
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier, also the last segment of every topic.
    pub client_id: String,
    /// Optional prefix in front of every topic.
    pub topic_prefix: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Capacity of the outgoing request queue.
    pub queue_capacity: usize,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "stateio".to_string(),
            topic_prefix: None,
            keep_alive_secs: 30,
            queue_capacity: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = MqttConfig::default();
        assert!(config.enabled);
        assert_eq!(config.broker_host, "localhost");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "stateio");
        assert_eq!(config.topic_prefix, None);
        assert_eq!(config.keep_alive_secs, 30);
        assert_eq!(config.queue_capacity, 64);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            enabled = false
            broker_host = "mqtt.example.com"
            broker_port = 8883
            client_id = "rack-1"
            topic_prefix = "site/a"
            keep_alive_secs = 60
            queue_capacity = 16
        "#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.broker_host, "mqtt.example.com");
        assert_eq!(config.broker_port, 8883);
        assert_eq!(config.client_id, "rack-1");
        assert_eq!(config.topic_prefix.as_deref(), Some("site/a"));
        assert_eq!(config.keep_alive_secs, 60);
        assert_eq!(config.queue_capacity, 16);
    }

    #[test]
    fn should_use_defaults_for_missing_fields() {
        let toml = r#"broker_host = "192.168.1.100""#;
        let config: MqttConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.broker_host, "192.168.1.100");
        assert_eq!(config.broker_port, 1883);
        assert_eq!(config.client_id, "stateio");
    }
}
