//! Application services: the coordination logic between ports.
//!
//! Each service accepts port implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod config_service;
pub mod config_store;
pub mod event_translator;
pub mod output_coordinator;
