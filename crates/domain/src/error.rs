//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`StateIoError`]
//! via `#[from]`. Nothing here is fatal: callers log and skip.

use crate::addressing::ChannelIndex;
use crate::channel::OutputType;
use crate::layout::Bank;

/// Top-level error for every stateio operation.
#[derive(Debug, thiserror::Error)]
pub enum StateIoError {
    /// The inbound payload could not be understood.
    #[error("malformed message")]
    Message(#[from] MessageError),

    /// The index does not fall inside the addressed bank.
    #[error("index out of range")]
    OutOfRange(#[from] OutOfRangeError),

    /// The request is well formed but violates a channel invariant.
    #[error("request rejected")]
    Rejected(#[from] RejectedError),

    /// A collaborator (bus, publisher, settings store) failed.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Reasons an inbound configuration or command payload is malformed.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// The payload root is not a JSON object.
    #[error("message must be a JSON object")]
    NotAnObject,

    /// A key was present but its value could not be decoded
    /// (unknown enum string, missing `index`/`command`, wrong type, …).
    #[error("invalid `{key}`")]
    InvalidField {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// One entry of an `inputs` / `outputs` array could not be decoded.
    #[error("invalid entry {position} of `{key}`")]
    InvalidEntry {
        key: &'static str,
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    /// `outputsPerMcp` is not a supported density.
    #[error("outputs per device must be 8 or 16, got {0}")]
    InvalidDensity(u64),
}

/// An index that does not map onto any present pin of the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{bank} index {index} is out of range")]
pub struct OutOfRangeError {
    pub bank: Bank,
    pub index: ChannelIndex,
}

/// Well-formed requests that would break a channel invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectedError {
    /// Interlock partners must live on the same device.
    #[error("interlock of output {index} with {partner} must be on the same device")]
    CrossDeviceInterlock {
        index: ChannelIndex,
        partner: ChannelIndex,
    },

    /// The command asserted a type that differs from the configured one.
    #[error("command type {requested} doesn't match configured type {configured} of output {index}")]
    TypeMismatch {
        index: ChannelIndex,
        configured: OutputType,
        requested: OutputType,
    },
}

impl StateIoError {
    /// Wrap any collaborator error as [`StateIoError::Transport`].
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Box::new(err))
    }
}
