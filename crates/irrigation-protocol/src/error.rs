//! Protocol Error Types
//!
//! Each error knows the response line it produces on the wire.

use crate::responder::{Arg, Responder};
use crate::respond;
use thiserror::Error;

/// Malformed command tokens detected while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Leading byte is not a known command letter
    #[error("Unknown command byte {0:#04x}")]
    BadCommand(u8),

    /// Byte after `V` is not a digit
    #[error("Invalid valve target byte {0:#04x}")]
    BadTarget(u8),
}

impl ParseError {
    /// Queue the error response (`Ec'<c>'` or `Et'<c>'`)
    pub fn respond<const N: usize>(&self, out: &mut Responder<N>) -> usize {
        match *self {
            ParseError::BadCommand(byte) => respond!(out, "Ec'%c'\r\n", Arg::Char(byte)),
            ParseError::BadTarget(byte) => respond!(out, "Et'%c'\r\n", Arg::Char(byte)),
        }
    }
}

/// Well-formed commands whose values are not acceptable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Parser has not completed a command
    #[error("No complete command to dispatch")]
    NoCommand,

    /// Reset value is neither of the privileged codes
    #[error("Reset code {0} not recognized")]
    BadResetCode(u16),

    /// Valve target outside the installed valves
    #[error("Valve {0} does not exist")]
    BadValveTarget(u8),
}

impl CommandError {
    /// Queue the error response (`Er<value>` or `Ev<value>`)
    pub fn respond<const N: usize>(&self, out: &mut Responder<N>) -> usize {
        match *self {
            CommandError::NoCommand => 0,
            CommandError::BadResetCode(value) => respond!(out, "Er%d\r\n", value),
            CommandError::BadValveTarget(target) => respond!(out, "Ev%d\r\n", target),
        }
    }
}
