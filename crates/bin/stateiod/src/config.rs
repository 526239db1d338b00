//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `stateio.toml` in the working directory (or the file named by
//! `STATEIO_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use stateio_adapter_mqtt::MqttConfig;
use stateio_domain::device::{DEVICE_COUNT, DeviceId, DevicePresence};

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Broker connection.
    pub mqtt: MqttConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Expander bus settings.
    pub bus: BusConfig,
    /// Persisted layout settings.
    pub settings: SettingsConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Expander bus configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Devices answering on the virtual bus (0..8).
    pub devices: Vec<u8>,
    /// Delay between two polling passes, in milliseconds.
    pub poll_interval_ms: u64,
}

/// Layout settings storage.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// JSON file holding the persisted layout.
    pub path: PathBuf,
}

impl Config {
    /// Load configuration from `stateio.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("STATEIO_CONFIG").unwrap_or_else(|_| "stateio.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("STATEIO_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("STATEIO_MQTT_PORT")
            && let Ok(port) = val.parse()
        {
            self.mqtt.broker_port = port;
        }
        if let Ok(val) = std::env::var("STATEIO_CLIENT_ID") {
            self.mqtt.client_id = val;
        }
        if let Ok(val) = std::env::var("STATEIO_SETTINGS_PATH") {
            self.settings.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("STATEIO_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mqtt.client_id.trim().is_empty() {
            return Err(ConfigError::Validation("client id must not be empty".to_string()));
        }
        if self.bus.poll_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be non-zero".to_string(),
            ));
        }
        if let Some(id) = self.bus.devices.iter().find(|&&id| id >= DEVICE_COUNT) {
            return Err(ConfigError::Validation(format!(
                "device {id} is out of range, expected 0..{DEVICE_COUNT}"
            )));
        }
        Ok(())
    }
}

impl BusConfig {
    /// Devices answering on the virtual bus.
    #[must_use]
    pub fn presence(&self) -> DevicePresence {
        self.devices.iter().copied().filter_map(DeviceId::new).collect()
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "stateiod=info,stateio=info".to_string(),
        }
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            devices: (0..DEVICE_COUNT).collect(),
            poll_interval_ms: 10,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stateio-settings.json"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
