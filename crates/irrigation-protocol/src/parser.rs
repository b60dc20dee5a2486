//! Command Parser
//!
//! A byte-driven state machine. Bytes arrive one at a time straight from
//! the serial link; nothing is buffered apart from the target digit and the
//! numeric accumulators.

use crate::error::ParseError;
use crate::ESC;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of numeric value slots a command can fill
pub const NUM_VALUES: usize = 2;

/// Parser position within a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    /// Waiting for a command letter
    Command,
    /// Waiting for the valve digit of a `V` command
    Target,
    /// Waiting for the first digit of the next value
    NextValue,
    /// Accumulating digits of the current value
    Value,
}

/// Command selected by the leading letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    None,
    Status,
    Reset,
    Valve,
}

/// Incremental command parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parser {
    state: State,
    command: Command,
    target: u8,
    index: usize,
    values: [u16; NUM_VALUES],
}

impl Parser {
    /// Create a parser waiting for a command letter
    pub const fn new() -> Self {
        Self {
            state: State::Command,
            command: Command::None,
            target: 0,
            index: 0,
            values: [0; NUM_VALUES],
        }
    }

    /// Return to the initial state, discarding any partial command
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Feed one byte.
    ///
    /// Returns `Ok(true)` when a command is complete; the caller must act on
    /// it and call [`Parser::reset`] before feeding more bytes. On `Err` the
    /// parser has already reset itself and the caller only has to report
    /// the error.
    pub fn parse(&mut self, byte: u8) -> Result<bool, ParseError> {
        match self.state {
            State::Command => match byte {
                b's' | b'S' => {
                    self.command = Command::Status;
                    return Ok(true);
                }
                b'r' | b'R' => {
                    self.command = Command::Reset;
                    self.state = State::NextValue;
                }
                b'v' | b'V' => {
                    self.command = Command::Valve;
                    self.state = State::Target;
                }
                _ if byte > b' ' => {
                    self.reset();
                    return Err(ParseError::BadCommand(byte));
                }
                _ => {}
            },
            State::Target => match byte {
                ESC => self.cancel(),
                b'0'..=b'9' => {
                    self.target = byte - b'0';
                    self.state = State::NextValue;
                }
                _ if byte > b' ' => {
                    self.reset();
                    return Err(ParseError::BadTarget(byte));
                }
                _ => {}
            },
            State::NextValue => match byte {
                ESC => self.cancel(),
                b'0'..=b'9' => {
                    self.values[self.index] = u16::from(byte - b'0');
                    self.state = State::Value;
                }
                _ => {}
            },
            State::Value => match byte {
                ESC => self.cancel(),
                b'0'..=b'9' => {
                    // Overflow wraps at 16 bits
                    let value = &mut self.values[self.index];
                    *value = value.wrapping_mul(10).wrapping_add(u16::from(byte - b'0'));
                }
                b',' | b':' => {
                    if self.index + 1 < NUM_VALUES {
                        self.index += 1;
                        self.state = State::NextValue;
                    } else {
                        return Ok(true);
                    }
                }
                // Any other byte terminates the value list, filled or not
                _ => return Ok(true),
            },
        }
        Ok(false)
    }

    fn cancel(&mut self) {
        debug!("Command {:?} cancelled by ESC", self.command);
        self.reset();
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Command selected so far
    pub fn command(&self) -> Command {
        self.command
    }

    /// Valve digit of a `V` command
    pub fn target(&self) -> u8 {
        self.target
    }

    /// Value slot currently accumulating
    pub fn index(&self) -> usize {
        self.index
    }

    /// Accumulated values; unfilled slots stay zero
    pub fn values(&self) -> [u16; NUM_VALUES] {
        self.values
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Feed bytes until a command completes; returns how many bytes were used
    fn feed(parser: &mut Parser, bytes: &[u8]) -> Option<usize> {
        for (i, &b) in bytes.iter().enumerate() {
            if parser.parse(b) == Ok(true) {
                return Some(i + 1);
            }
        }
        None
    }

    #[test]
    fn test_status_completes_on_first_byte() {
        for letter in [b's', b'S'] {
            let mut parser = Parser::new();
            assert_eq!(feed(&mut parser, &[letter, b'\r']), Some(1));
            assert_eq!(parser.command(), Command::Status);
        }
    }

    #[test]
    fn test_leading_whitespace_ignored() {
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, b"\r\n  \tS"), Some(6));
    }

    #[test]
    fn test_valve_single_value() {
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, b"V0100\r"), Some(6));
        assert_eq!(parser.command(), Command::Valve);
        assert_eq!(parser.target(), 0);
        assert_eq!(parser.values(), [100, 0]);
    }

    #[test]
    fn test_separator_waits_for_next_digit() {
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, b"V0100,\r"), None);
        assert_eq!(parser.state(), State::NextValue);
        assert_eq!(parser.index(), 1);
        assert_eq!(feed(&mut parser, b"5\r"), Some(2));
        assert_eq!(parser.values(), [100, 5]);
    }

    #[test]
    fn test_valve_two_values() {
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, b"v1 30:45\n"), Some(9));
        assert_eq!(parser.target(), 1);
        assert_eq!(parser.values(), [30, 45]);
    }

    #[test]
    fn test_second_separator_completes() {
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, b"V17,8,99"), Some(6));
        assert_eq!(parser.values(), [7, 8]);
        assert!(parser.index() < NUM_VALUES);
    }

    #[test]
    fn test_reset_value() {
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, b"R5511\r"), Some(6));
        assert_eq!(parser.command(), Command::Reset);
        assert_eq!(parser.values()[0], 5511);
    }

    #[test]
    fn test_next_value_skips_noise() {
        let mut parser = Parser::new();
        assert_eq!(feed(&mut parser, b"R=x 42;"), Some(7));
        assert_eq!(parser.values(), [42, 0]);
    }

    #[test]
    fn test_value_wraps_at_16_bits() {
        let mut parser = Parser::new();
        feed(&mut parser, b"R70000\r");
        assert_eq!(parser.values()[0], 70000u32 as u16);
    }

    #[test]
    fn test_bad_command() {
        let mut parser = Parser::new();
        assert_eq!(parser.parse(b'X'), Err(ParseError::BadCommand(b'X')));
        assert_eq!(parser, Parser::new());
    }

    #[test]
    fn test_bad_target() {
        let mut parser = Parser::new();
        assert_eq!(parser.parse(b'V'), Ok(false));
        assert_eq!(parser.parse(b' '), Ok(false));
        assert_eq!(parser.parse(b'q'), Err(ParseError::BadTarget(b'q')));
        assert_eq!(parser, Parser::new());
    }

    #[test]
    fn test_escape_cancels_silently() {
        let prefixes: [&[u8]; 6] = [b"V", b"V1", b"V12", b"V12,", b"R", b"R10"];
        for prefix in prefixes {
            let mut parser = Parser::new();
            assert_eq!(feed(&mut parser, prefix), None);
            assert_eq!(parser.parse(ESC), Ok(false));
            assert_eq!(parser, Parser::new());
        }
    }

    #[test]
    fn test_escape_ignored_while_idle() {
        let mut parser = Parser::new();
        assert_eq!(parser.parse(ESC), Ok(false));
        assert_eq!(parser.state(), State::Command);
    }

    fn arb_bytes() -> impl Strategy<Value = Vec<u8>> {
        let alphabet = prop::sample::select(b"sSrRvVxq0123456789,: \r\n\x1b".to_vec());
        prop::collection::vec(prop_oneof![4 => alphabet, 1 => any::<u8>()], 0..64)
    }

    proptest! {
        #[test]
        fn prop_reset_from_any_state(bytes in arb_bytes()) {
            let mut parser = Parser::new();
            for b in bytes {
                if parser.parse(b) == Ok(true) {
                    break;
                }
            }
            parser.reset();
            prop_assert_eq!(parser.state(), State::Command);
            prop_assert_eq!(parser.command(), Command::None);
            prop_assert_eq!(parser.target(), 0);
            prop_assert_eq!(parser.index(), 0);
            prop_assert_eq!(parser.values(), [0, 0]);
        }

        #[test]
        fn prop_parse_is_deterministic(bytes in arb_bytes()) {
            let mut a = Parser::new();
            let mut b = Parser::new();
            for byte in bytes {
                let ra = a.parse(byte);
                prop_assert_eq!(ra, b.parse(byte));
                prop_assert_eq!(&a, &b);
                prop_assert!(a.index() < NUM_VALUES);
                if ra == Ok(true) {
                    a.reset();
                    b.reset();
                }
            }
        }
    }
}
