//! # stateio-adapter-virtual
//!
//! Simulated expander bank for running without hardware and for tests.
//!
//! ## Provided collaborators
//!
//! | Port | Implementation | Behaviour |
//! |------|----------------|-----------|
//! | `ExpanderBus` | [`VirtualBus`] | Eight in-memory 16-bit registers; inputs idle high (pull-ups) |
//! | `InputClassifier` | [`EdgeInputClassifier`] | One event per level change, no debounce or multi-press timing |
//! | `OutputExecutor` | [`BasicOutputExecutor`] | On/off, timer expiry and same-device interlock |
//! | `SettingsStore` | [`MemorySettingsStore`] | Keeps the layout in memory |
//!
//! ## Dependency rule
//!
//! Depends on `stateio-app` (port traits) and `stateio-domain` only.

mod bus;
mod input;
mod output;
mod settings;

pub use bus::{VirtualBus, VirtualBusError};
pub use input::EdgeInputClassifier;
pub use output::BasicOutputExecutor;
pub use settings::MemorySettingsStore;
