//! File-backed layout settings.

use std::path::{Path, PathBuf};

use stateio_app::ports::SettingsStore;
use stateio_domain::error::StateIoError;
use stateio_domain::layout::LayoutSettings;

/// Errors raised while reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access settings file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode settings file `{}`", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode settings for `{}`", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SettingsError {
    /// Convert into the domain-level error type.
    #[must_use]
    pub fn into_domain(self) -> StateIoError {
        StateIoError::transport(self)
    }
}

/// Stores [`LayoutSettings`] as a small JSON document.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StateIoError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
        .into_domain()
    }

    fn decode_error(&self, source: serde_json::Error) -> StateIoError {
        SettingsError::Decode {
            path: self.path.clone(),
            source,
        }
        .into_domain()
    }

    fn encode_error(&self, source: serde_json::Error) -> StateIoError {
        SettingsError::Encode {
            path: self.path.clone(),
            source,
        }
        .into_domain()
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&mut self) -> Result<Option<LayoutSettings>, StateIoError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(self.io_error(err)),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|err| self.decode_error(err))
    }

    fn save(&mut self, settings: LayoutSettings) -> Result<(), StateIoError> {
        let content =
            serde_json::to_string_pretty(&settings).map_err(|err| self.encode_error(err))?;
        std::fs::write(&self.path, content).map_err(|err| self.io_error(err))?;
        tracing::info!(path = %self.path.display(), "layout settings saved");
        Ok(())
    }
}
