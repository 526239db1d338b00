//! In-memory layout settings.

use stateio_app::ports::SettingsStore;
use stateio_domain::error::StateIoError;
use stateio_domain::layout::LayoutSettings;

/// Keeps the layout settings for the lifetime of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySettingsStore {
    saved: Option<LayoutSettings>,
}

impl MemorySettingsStore {
    /// A store that already holds `settings`.
    #[must_use]
    pub const fn with(settings: LayoutSettings) -> Self {
        Self {
            saved: Some(settings),
        }
    }

    #[must_use]
    pub const fn saved(&self) -> Option<LayoutSettings> {
        self.saved
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&mut self) -> Result<Option<LayoutSettings>, StateIoError> {
        Ok(self.saved)
    }

    fn save(&mut self, settings: LayoutSettings) -> Result<(), StateIoError> {
        self.saved = Some(settings);
        Ok(())
    }
}
