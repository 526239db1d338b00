//! # stateio-domain
//!
//! Pure domain model for the stateio expander firmware.
//!
//! ## Responsibilities
//! - Describe the **devices** on the expander bus and their presence
//! - Hold the sealed **partition model** (split point + output density)
//! - Map logical channel indices to `(device, pin)` addresses and back
//! - Define the **channel vocabularies** (input/output types, commands)
//!   shared by the message parser and the schema generator
//! - Define the published **status events** and their event names
//! - Parse inbound **configuration** and **command** messages
//! - Generate the self-describing **configuration/command schemas**
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod vocabulary;

pub mod addressing;
pub mod channel;
pub mod device;
pub mod event;
pub mod layout;
pub mod message;
pub mod schema;
