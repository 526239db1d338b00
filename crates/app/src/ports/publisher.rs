//! Status publisher port: the upstream channel for status payloads.

use serde_json::Value;

use stateio_domain::error::StateIoError;

/// Delivers status payloads to the upstream controller.
pub trait StatusPublisher {
    /// Publish one status payload.
    ///
    /// # Errors
    ///
    /// Returns [`StateIoError::Transport`] when the payload could not be
    /// handed to the transport (disconnected, queue full, …).
    fn publish_status(&mut self, payload: &Value) -> Result<(), StateIoError>;
}
