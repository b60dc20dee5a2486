//! Format Directive Decoding
//!
//! Recognizes the small `%` directive subset used by responses and renders
//! a single argument into a scratch buffer.

use crate::responder::Arg;
use std::fmt::{self, Write};

/// Scratch space for one rendered directive; longer renderings are cut short
const SCRATCH_LEN: usize = 64;

/// Integer length modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// No modifier (32-bit)
    Int,
    /// `l` (32-bit on the controller)
    Long,
    /// `ll` (64-bit)
    LongLong,
}

/// A recognized `%` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// `%%`
    Percent,
    /// `%c`
    Character,
    /// `%d` or `%i`, optionally with `l`/`ll`
    Signed(Length),
    /// `%u`, optionally with `l`/`ll`
    Unsigned(Length),
    /// `%p`, rendered as an unsigned decimal address
    Pointer,
    /// `%f`
    Double,
    /// `%s`
    String,
}

impl Directive {
    /// Parse the directive following a `%`.
    ///
    /// Returns the directive and the number of bytes it spans, or `None`
    /// when the bytes do not form a supported directive.
    pub fn parse(bytes: &[u8]) -> Option<(Self, usize)> {
        let (length, used) = match bytes {
            [b'l', b'l', ..] => (Some(Length::LongLong), 2),
            [b'l', ..] => (Some(Length::Long), 1),
            _ => (None, 0),
        };

        let directive = match (bytes.get(used).copied()?, length) {
            (b'd' | b'i', length) => Directive::Signed(length.unwrap_or(Length::Int)),
            (b'u', length) => Directive::Unsigned(length.unwrap_or(Length::Int)),
            (b'%', None) => Directive::Percent,
            (b'c', None) => Directive::Character,
            (b'p', None) => Directive::Pointer,
            (b'f', None) => Directive::Double,
            (b's', None) => Directive::String,
            _ => return None,
        };

        Some((directive, used + 1))
    }

    /// Whether rendering this directive consumes an argument
    pub fn takes_argument(&self) -> bool {
        !matches!(self, Directive::Percent)
    }
}

/// Renders one directive at a time into an owned scratch buffer.
///
/// The returned bytes borrow the decoder, so they are gone by the time the
/// next directive is decoded.
pub struct Decoder {
    scratch: [u8; SCRATCH_LEN],
    len: usize,
}

impl Decoder {
    /// Create a decoder with an empty scratch buffer
    pub const fn new() -> Self {
        Self {
            scratch: [0; SCRATCH_LEN],
            len: 0,
        }
    }

    /// Render `arg` as `directive`.
    ///
    /// Returns `None` when the argument is missing or cannot satisfy the
    /// directive, which callers treat the same as an unknown directive.
    /// `%%` ignores `arg`.
    pub fn decode<'r>(&'r mut self, directive: Directive, arg: Option<&Arg<'r>>) -> Option<&'r [u8]> {
        self.len = 0;
        match directive {
            Directive::Percent => self.push(b'%'),
            Directive::Character => self.push(arg?.integer_bits()? as u8),
            Directive::Signed(Length::Int | Length::Long) => {
                self.render(arg?.integer_bits()? as u32 as i32)
            }
            Directive::Signed(Length::LongLong) => self.render(arg?.integer_bits()? as i64),
            Directive::Unsigned(Length::Int | Length::Long) => {
                self.render(arg?.integer_bits()? as u32)
            }
            Directive::Unsigned(Length::LongLong) => self.render(arg?.integer_bits()?),
            Directive::Pointer => match *arg? {
                Arg::Ptr(address) => self.render(address as u32),
                Arg::Uint(address) => self.render(address as u32),
                _ => return None,
            },
            Directive::Double => match *arg? {
                // printf spelling; Display would give "NaN"
                Arg::Float(value) if value.is_nan() => self.render("nan"),
                Arg::Float(value) => {
                    let _ = write!(self, "{:.6}", value);
                }
                _ => return None,
            },
            Directive::String => {
                return match *arg? {
                    Arg::Str(text) => Some(text.as_bytes()),
                    _ => None,
                };
            }
        }
        Some(&self.scratch[..self.len])
    }

    fn push(&mut self, byte: u8) {
        self.scratch[0] = byte;
        self.len = 1;
    }

    fn render(&mut self, value: impl fmt::Display) {
        // Overlong output is truncated by write_str
        let _ = write!(self, "{}", value);
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for Decoder {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = SCRATCH_LEN - self.len;
        let take = s.len().min(room);
        self.scratch[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        if take < s.len() {
            Err(fmt::Error)
        } else {
            Ok(())
        }
    }
}
