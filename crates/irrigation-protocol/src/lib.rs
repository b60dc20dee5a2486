//! Irrigation Controller Wire Protocol
//!
//! This crate implements the compact ASCII protocol spoken over the
//! controller's serial link: a byte-at-a-time command parser and a
//! responder that formats replies into a fixed-capacity output ring
//! without ever blocking the control loop.

mod directive;
mod error;
mod parser;
mod report;
mod request;
mod responder;

pub use directive::{Decoder, Directive, Length};
pub use error::{CommandError, ParseError};
pub use parser::{Command, Parser, State, NUM_VALUES};
pub use report::{acknowledge_pulse, Reading, StatusReport};
pub use request::Request;
pub use responder::{Arg, Responder};

pub use ring_buffer::{OutputRing, RingStats, DEFAULT_CAPACITY};

/// Escape byte; cancels a partially received command
pub const ESC: u8 = 27;

/// Number of addressable valves
pub const VALVE_COUNT: u8 = 2;

/// Privileged values accepted by the `R` command
pub mod reset_code {
    /// Reboot into the USB firmware loader
    pub const FIRMWARE_UPDATE: u16 = 5511;
    /// Watchdog reboot after a short delay
    pub const REBOOT: u16 = 1033;
}

/// Queue a formatted response.
///
/// Arguments are converted into [`Arg`] values in order, so
/// `respond!(out, "Er%d\r\n", value)` reads like the wire format it produces.
/// Evaluates to the number of bytes queued.
#[macro_export]
macro_rules! respond {
    ($out:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $out.respond($format, &[$($crate::Arg::from($arg)),*])
    };
}
