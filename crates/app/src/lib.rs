//! # stateio-app
//!
//! Application layer: services, the runtime loop and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `ExpanderBus`: probe, configure, read and write expander pins
//!   - `StatusPublisher`: deliver status payloads upstream
//!   - `InputClassifier` / `OutputExecutor`: per-pin behaviour engines
//!   - `DisplayHints`: optional front-panel hints
//!   - `SettingsStore`: persisted layout settings
//! - Hold the per-pin **channel configuration** (`ChannelConfigStore`)
//! - Route configuration and command entries to pins (`OutputCoordinator`)
//! - Translate pin events into status payloads (`EventTranslator`)
//! - Drive everything from a single cooperative loop (`Runtime`)
//!
//! ## Dependency rule
//! Depends on `stateio-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod runtime;
pub mod services;
