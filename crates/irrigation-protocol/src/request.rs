//! Decoded Requests
//!
//! Turns a completed parse into the action it asks for, validating the
//! privileged values along the way.

use crate::error::CommandError;
use crate::parser::{Command, Parser};
use crate::{reset_code, VALVE_COUNT};
use serde::{Deserialize, Serialize};

/// An action requested over the serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Report indicator, valve and sensor state
    Status,
    /// Reboot into the firmware loader
    FirmwareUpdate,
    /// Delayed hardware reboot
    Reboot,
    /// Open `valve` for `duration` (units belong to the valve driver)
    Pulse { valve: u8, duration: u16 },
}

impl TryFrom<&Parser> for Request {
    type Error = CommandError;

    fn try_from(parser: &Parser) -> Result<Self, Self::Error> {
        let value = parser.values()[0];
        match parser.command() {
            Command::None => Err(CommandError::NoCommand),
            Command::Status => Ok(Request::Status),
            Command::Reset => match value {
                reset_code::FIRMWARE_UPDATE => Ok(Request::FirmwareUpdate),
                reset_code::REBOOT => Ok(Request::Reboot),
                other => Err(CommandError::BadResetCode(other)),
            },
            Command::Valve if parser.target() < VALVE_COUNT => Ok(Request::Pulse {
                valve: parser.target(),
                duration: value,
            }),
            Command::Valve => Err(CommandError::BadValveTarget(parser.target())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(bytes: &[u8]) -> Result<Request, CommandError> {
        let mut parser = Parser::new();
        for &b in bytes {
            if parser.parse(b) == Ok(true) {
                break;
            }
        }
        Request::try_from(&parser)
    }

    #[test]
    fn test_status() {
        assert_eq!(request(b"s"), Ok(Request::Status));
    }

    #[test]
    fn test_reset_codes() {
        assert_eq!(request(b"R5511\r"), Ok(Request::FirmwareUpdate));
        assert_eq!(request(b"r1033\n"), Ok(Request::Reboot));
        assert_eq!(request(b"R42\r"), Err(CommandError::BadResetCode(42)));
    }

    #[test]
    fn test_valve_targets() {
        assert_eq!(
            request(b"V1250\r"),
            Ok(Request::Pulse { valve: 1, duration: 250 })
        );
        assert_eq!(request(b"V730\r"), Err(CommandError::BadValveTarget(7)));
    }

    #[test]
    fn test_idle_parser() {
        assert_eq!(Request::try_from(&Parser::new()), Err(CommandError::NoCommand));
    }
}
