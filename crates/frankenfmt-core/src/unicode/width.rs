//! Display width measurement.
//!
//! The formatter never measures text itself; it asks a [`WidthMeasure`].
//! [`TermWidth`] gives terminal column counts from the Unicode East Asian
//! Width tables, [`ByteWidth`] treats every byte as one column.

use thiserror::Error;
use unicode_width::UnicodeWidthChar;

use super::utf8::{code_points, validate};

/// Why a chunk could not be measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WidthError {
    /// Invalid UTF-8 or a code point with no printable width.
    #[error("text is invalid or not printable")]
    Invalid,
    /// The running total no longer fits a signed 32-bit column count.
    #[error("display width overflows i32")]
    Overflow,
}

/// Measures the display width of one text chunk.
pub trait WidthMeasure {
    fn measure(&mut self, text: &[u8]) -> Result<u32, WidthError>;
}

impl<M: WidthMeasure + ?Sized> WidthMeasure for &mut M {
    fn measure(&mut self, text: &[u8]) -> Result<u32, WidthError> {
        (**self).measure(text)
    }
}

/// Terminal column width.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TermWidth;

impl WidthMeasure for TermWidth {
    fn measure(&mut self, text: &[u8]) -> Result<u32, WidthError> {
        utf8_term_width(text)
    }
}

/// One column per byte. Accepts anything, including invalid UTF-8.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ByteWidth;

impl WidthMeasure for ByteWidth {
    fn measure(&mut self, text: &[u8]) -> Result<u32, WidthError> {
        i32::try_from(text.len())
            .map(|w| w as u32)
            .map_err(|_| WidthError::Overflow)
    }
}

/// Terminal width of one code point: 0, 1 or 2 columns, `None` when not
/// printable (controls, surrogates, values above U+10FFFF).
#[must_use]
pub fn ucp_term_width(cp: u32) -> Option<u8> {
    let ch = char::from_u32(cp)?;
    if ch.is_control() {
        return None;
    }
    ch.width().map(|w| w as u8)
}

/// Total terminal width of a UTF-8 buffer.
pub fn utf8_term_width(text: &[u8]) -> Result<u32, WidthError> {
    validate(text).map_err(|_| WidthError::Invalid)?;
    let mut total: i32 = 0;
    for cp in code_points(text) {
        let w = ucp_term_width(cp).ok_or(WidthError::Invalid)?;
        total = total
            .checked_add(i32::from(w))
            .ok_or(WidthError::Overflow)?;
    }
    Ok(total as u32)
}
