//! Text to integer parsing with optional radix auto-detection.

use super::{MAX_RADIX, MIN_RADIX};

/// How a parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStatus {
    /// Every input byte was consumed.
    Complete,
    /// Parsing stopped at a byte that is not a digit in the radix.
    Stop,
    /// The next digit would not fit in 64 bits.
    Overflow,
    /// Radix outside `2..=36` (and not 0).
    InvalidRadix,
}

/// Outcome of [`parse_u64`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedU64 {
    /// Accumulated value. On overflow, the value before the offending digit.
    pub value: u64,
    /// Bytes consumed, prefix included. On stop or overflow this is the
    /// offset of the byte that ended parsing.
    pub consumed: usize,
    pub status: ParseStatus,
}

impl ParsedU64 {
    const fn new(value: u64, consumed: usize, status: ParseStatus) -> Self {
        Self {
            value,
            consumed,
            status,
        }
    }
}

/// Decode one character as a digit in `radix`, case-insensitively.
///
/// Takes a code point so callers holding decoded text can use it directly.
#[must_use]
pub fn digit_from_char(ch: u32, radix: u8) -> Option<u8> {
    let digit = match ch {
        0x30..=0x39 => ch - 0x30,
        0x41..=0x5A => ch - 0x41 + 10,
        0x61..=0x7A => ch - 0x61 + 10,
        _ => return None,
    };
    (digit < u32::from(radix)).then_some(digit as u8)
}

/// Inspect a radix prefix. Returns the radix and how many bytes the prefix
/// occupies; text without a recognised prefix is decimal.
///
/// Only lowercase `0b`, `0o`, `0d` and `0x` are recognised.
#[must_use]
pub fn detect_radix(text: &[u8]) -> (u8, usize) {
    match text {
        [b'0', b'b', ..] => (2, 2),
        [b'0', b'o', ..] => (8, 2),
        [b'0', b'd', ..] => (10, 2),
        [b'0', b'x', ..] => (16, 2),
        _ => (10, 0),
    }
}

/// Parse an unsigned integer. `radix == 0` auto-detects from the prefix.
///
/// No whitespace or sign is accepted. Empty input reports [`ParseStatus::Stop`]
/// with nothing consumed.
#[must_use]
pub fn parse_u64(text: &[u8], radix: u8) -> ParsedU64 {
    if text.is_empty() {
        return ParsedU64::new(0, 0, ParseStatus::Stop);
    }

    let (radix, mut i) = if radix == 0 {
        detect_radix(text)
    } else {
        (radix, 0)
    };
    if !(MIN_RADIX..=MAX_RADIX).contains(&radix) {
        return ParsedU64::new(0, 0, ParseStatus::InvalidRadix);
    }

    let base = u64::from(radix);
    let cutoff = u64::MAX / base;
    let cutlim = u64::MAX % base;
    let mut acc: u64 = 0;

    while i < text.len() {
        let Some(digit) = digit_from_char(u32::from(text[i]), radix) else {
            return ParsedU64::new(acc, i, ParseStatus::Stop);
        };
        let digit = u64::from(digit);
        if acc > cutoff || (acc == cutoff && digit > cutlim) {
            return ParsedU64::new(acc, i, ParseStatus::Overflow);
        }
        acc = acc * base + digit;
        i += 1;
    }

    ParsedU64::new(acc, i, ParseStatus::Complete)
}
