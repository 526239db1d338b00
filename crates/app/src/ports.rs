//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the service layer and the
//! adapter layer can depend on them without creating circular dependencies.
//!
//! Every port is synchronous: the runtime is a single cooperative loop and
//! each call is expected to return promptly.

pub mod bus;
pub mod display;
pub mod input;
pub mod output;
pub mod publisher;
pub mod settings;

pub use bus::{ExpanderBus, PinMode};
pub use display::{DisplayHints, DisplayPinType, NoDisplay};
pub use input::InputClassifier;
pub use output::{OutputExecutor, SwitchCommand};
pub use publisher::StatusPublisher;
pub use settings::SettingsStore;
