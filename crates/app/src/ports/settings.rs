//! Settings port: persisted layout settings.

use stateio_domain::error::StateIoError;
use stateio_domain::layout::LayoutSettings;

/// Non-volatile storage for the layout settings read at boot.
pub trait SettingsStore {
    /// Load the persisted settings, `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::Transport`] when the storage can't be read.
    fn load(&mut self) -> Result<Option<LayoutSettings>, StateIoError>;

    /// Persist `settings` for the next boot.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::Transport`] when the storage can't be written.
    fn save(&mut self, settings: LayoutSettings) -> Result<(), StateIoError>;
}
