//! Numeral conversion.
//!
//! Integer rendering in any radix from 2 to 36 (with minimum width, digit
//! grouping, sign policy and literal prefix) and the inverse parser with
//! radix auto-detection. Both directions work on caller-supplied buffers.

mod parse;
mod render;

pub use parse::{ParseStatus, ParsedU64, detect_radix, digit_from_char, parse_u64};
pub use render::{
    DIGITS, MAX_RADIX, MIN_RADIX, NO_GROUPING, NumeralStyle, SignMode, render_i64, render_u64,
};
pub(crate) use render::render_sign_magnitude;

use thiserror::Error;

/// Failure of a numeral rendering call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NumeralError {
    /// Radix outside `2..=36`.
    #[error("radix {0} is outside 2..=36")]
    BadRadix(u8),
    /// The caller's buffer cannot hold the rendered numeral.
    #[error("output buffer of {capacity} bytes is too small for the numeral")]
    BufferTooSmall { capacity: usize },
}
