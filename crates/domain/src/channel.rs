//! Channel vocabularies and per-channel configuration.
//!
//! The type and command names below are the only spelling of these strings in
//! the workspace; the message parser, status events and schemas all go
//! through the same tables.

use std::num::NonZeroU32;

use crate::vocabulary::vocabulary;

/// Timer duration applied when `timerSeconds` is omitted or `null`.
pub const DEFAULT_TIMER_SECS: NonZeroU32 = match NonZeroU32::new(60) {
    Some(secs) => secs,
    None => unreachable!(),
};

vocabulary! {
    /// How an input pin is classified into events.
    #[derive(Default)]
    pub enum InputType("input type") {
        Button => "button",
        Contact => "contact",
        Press => "press",
        Rotary => "rotary",
        Security => "security",
        #[default]
        Switch => "switch",
        Toggle => "toggle",
    }
}

vocabulary! {
    /// How an output pin is driven.
    #[derive(Default)]
    pub enum OutputType("output type") {
        #[default]
        Relay => "relay",
        Motor => "motor",
        Timer => "timer",
    }
}

vocabulary! {
    /// Command accepted for an output channel.
    pub enum OutputCommand("output command") {
        Query => "query",
        On => "on",
        Off => "off",
    }
}

/// Configuration of one input pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputConfig {
    pub input_type: InputType,
    pub invert: bool,
    pub disabled: bool,
}

/// Configuration of one output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub output_type: OutputType,
    /// On-time for [`OutputType::Timer`] outputs.
    pub timer: NonZeroU32,
    /// Same-device partner pin; equal to the pin itself when not interlocked.
    pub interlock: u8,
}

impl OutputConfig {
    /// Default configuration for `pin`: relay, 60 s timer, no interlock.
    #[must_use]
    pub const fn new(pin: u8) -> Self {
        Self {
            output_type: OutputType::Relay,
            timer: DEFAULT_TIMER_SECS,
            interlock: pin,
        }
    }

    /// Interlock partner of `pin`, if any.
    #[must_use]
    pub const fn interlock_partner(&self, pin: u8) -> Option<u8> {
        if self.interlock == pin {
            None
        } else {
            Some(self.interlock)
        }
    }
}
