//! Ring-Buffered Responder
//!
//! Formats responses straight into the output ring. Rendering is
//! fire-and-forget: a full ring or an unsupported directive ends the
//! current response early and whatever was already queued is kept.

use crate::directive::{Decoder, Directive};
use ring_buffer::{OutputRing, RingStats, DEFAULT_CAPACITY};
use tracing::{debug, trace};

/// A single typed format argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Arg<'a> {
    /// A character for `%c`
    Char(u8),
    /// A signed integer
    Int(i64),
    /// An unsigned integer
    Uint(u64),
    /// An address for `%p`
    Ptr(usize),
    /// A floating point value for `%f`
    Float(f64),
    /// A string for `%s`
    Str(&'a str),
}

impl Arg<'_> {
    /// Raw two's complement bits for the integer directives.
    ///
    /// Integer directives accept any integer-like argument and truncate it
    /// to their own width.
    pub(crate) fn integer_bits(&self) -> Option<u64> {
        match *self {
            Arg::Char(c) => Some(u64::from(c)),
            Arg::Int(value) => Some(value as u64),
            Arg::Uint(value) => Some(value),
            Arg::Ptr(_) | Arg::Float(_) | Arg::Str(_) => None,
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident: $($ty:ty),*) => {
        $(impl From<$ty> for Arg<'_> {
            fn from(value: $ty) -> Self {
                Arg::$variant(value as _)
            }
        })*
    };
}

impl_from_int!(Int: i8, i16, i32, i64, isize);
impl_from_int!(Uint: u8, u16, u32, u64, usize);

impl From<bool> for Arg<'_> {
    fn from(value: bool) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(u8::try_from(value).unwrap_or(b'?'))
    }
}

impl From<f32> for Arg<'_> {
    fn from(value: f32) -> Self {
        Arg::Float(f64::from(value))
    }
}

impl From<f64> for Arg<'_> {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value)
    }
}

impl<T> From<*const T> for Arg<'_> {
    fn from(value: *const T) -> Self {
        Arg::Ptr(value as usize)
    }
}

/// Output ring plus the decoder used to render into it
pub struct Responder<const N: usize = DEFAULT_CAPACITY> {
    ring: OutputRing<N>,
    decoder: Decoder,
}

impl<const N: usize> Responder<N> {
    /// Create a responder with an empty output ring
    pub const fn new() -> Self {
        Self {
            ring: OutputRing::new(),
            decoder: Decoder::new(),
        }
    }

    /// Render `format` with `args` into the output ring.
    ///
    /// Returns the number of bytes queued. Rendering stops at the first
    /// unsupported directive, missing or mismatched argument, or as soon as
    /// the ring refuses a byte.
    pub fn respond(&mut self, format: &str, args: &[Arg<'_>]) -> usize {
        let mut queued = 0;
        let mut args = args.iter();
        let mut rest = format.as_bytes();

        while let Some((&byte, tail)) = rest.split_first() {
            if byte != b'%' {
                if !self.ring.put(byte) {
                    trace!("Output ring full, response truncated after {} bytes", queued);
                    return queued;
                }
                queued += 1;
                rest = tail;
                continue;
            }

            let Some((directive, used)) = Directive::parse(tail) else {
                debug!("Unsupported directive in {:?}, response abandoned", format);
                return queued;
            };
            rest = &tail[used..];

            let arg = if directive.takes_argument() {
                args.next()
            } else {
                None
            };
            let Some(rendered) = self.decoder.decode(directive, arg) else {
                debug!("No usable argument for {:?} in {:?}", directive, format);
                return queued;
            };

            for &b in rendered {
                if !self.ring.put(b) {
                    trace!("Output ring full, response truncated after {} bytes", queued);
                    return queued;
                }
                queued += 1;
            }
        }

        queued
    }

    /// Contiguous span ready for the transport
    pub fn pending(&self) -> &[u8] {
        self.ring.pending()
    }

    /// Mark `count` bytes as sent by the transport
    pub fn advance(&mut self, count: usize) {
        self.ring.advance(count);
    }

    /// The underlying output ring
    pub fn ring(&self) -> &OutputRing<N> {
        &self.ring
    }

    /// Ring occupancy and traffic counters
    pub fn stats(&self) -> RingStats {
        self.ring.stats()
    }
}

impl<const N: usize> Default for Responder<N> {
    fn default() -> Self {
        Self::new()
    }
}
