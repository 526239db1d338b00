//! # stateio-adapter-mqtt
//!
//! MQTT transport between the expander bank and its upstream controller.
//!
//! ## Responsibilities
//! - Connect to the broker and subscribe to the `conf` and `cmnd` topics
//! - Forward inbound configuration and command payloads to the runtime
//! - Publish status payloads (`StatusPublisher` port) without blocking
//! - Publish the retained adoption payload carrying both schemas
//!
//! ## Dependency rule
//! Same as other adapters: depends on `stateio-app` and `stateio-domain`.

pub mod adoption;
pub mod config;
pub mod error;
pub mod link;
pub mod topics;

pub use adoption::Firmware;
pub use config::MqttConfig;
pub use error::MqttError;
pub use link::{Inbound, MqttLink, MqttPublisher};
pub use topics::Topics;
