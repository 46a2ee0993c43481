//! Chunked streaming converters.
//!
//! A converter turns an input chunk into an output chunk without ever writing
//! past the output buffer. Callers loop: feed input, drain output, feed the
//! remainder, and finally call [`ChunkConverter::finish`] once to flush any
//! byte the converter is still holding.

mod escape;
mod hex;

pub use escape::{CEscape, CEscapeForceHex, EscapeState, escaped_len};
pub use hex::{BinToHex, HexToBin, hex_value};

/// Outcome class of a converter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConvStatus {
    /// All input was consumed (some of it may be held in the state).
    Complete,
    /// Input byte at `consumed` cannot be converted.
    Malformed,
    /// Input ends in the middle of a unit; re-feed from `consumed` with more
    /// data appended.
    Incomplete,
    /// Output buffer exhausted; call again with fresh output and the input
    /// from `consumed` on.
    Full,
}

/// Result of one [`ChunkConverter::feed`] or [`ChunkConverter::finish`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvStep {
    pub consumed: usize,
    pub produced: usize,
    pub status: ConvStatus,
}

impl ConvStep {
    #[must_use]
    pub const fn new(consumed: usize, produced: usize, status: ConvStatus) -> Self {
        Self {
            consumed,
            produced,
            status,
        }
    }

    /// `Complete` or `Full`: the caller may keep going.
    #[must_use]
    pub const fn can_continue(&self) -> bool {
        matches!(self.status, ConvStatus::Complete | ConvStatus::Full)
    }
}

/// Streaming byte transform.
///
/// Stateless converters use `()` as their state and can rely on the default
/// `finish`, which flushes nothing.
pub trait ChunkConverter {
    type State: Default;

    fn feed(&self, state: &mut Self::State, input: &[u8], output: &mut [u8]) -> ConvStep;

    fn finish(&self, _state: &mut Self::State, _output: &mut [u8]) -> ConvStep {
        ConvStep::new(0, 0, ConvStatus::Complete)
    }
}

impl<C: ChunkConverter + ?Sized> ChunkConverter for &C {
    type State = C::State;

    fn feed(&self, state: &mut Self::State, input: &[u8], output: &mut [u8]) -> ConvStep {
        (**self).feed(state, input, output)
    }

    fn finish(&self, state: &mut Self::State, output: &mut [u8]) -> ConvStep {
        (**self).finish(state, output)
    }
}

/// Feed the whole input into a single output buffer and finish, starting from
/// a fresh state. `produced` covers both steps.
pub fn convert_whole<C: ChunkConverter>(conv: &C, input: &[u8], output: &mut [u8]) -> ConvStep {
    let mut state = C::State::default();
    let step = conv.feed(&mut state, input, output);
    if step.status != ConvStatus::Complete {
        return step;
    }
    let tail = conv.finish(&mut state, &mut output[step.produced..]);
    ConvStep::new(step.consumed, step.produced + tail.produced, tail.status)
}

/// Copy `bytes` into `output` at `at` if they fit.
fn put(output: &mut [u8], at: usize, bytes: &[u8]) -> Option<usize> {
    output
        .get_mut(at..at + bytes.len())?
        .copy_from_slice(bytes);
    Some(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_whole_flushes_pending_escape() {
        let mut out = [0u8; 16];
        let step = convert_whole(&CEscape, b"a\x01", &mut out);
        assert_eq!(step, ConvStep::new(2, 5, ConvStatus::Complete));
        assert_eq!(&out[..5], b"a\\x01");
    }

    #[test]
    fn convert_whole_reports_full_from_finish() {
        let mut out = [0u8; 3];
        let step = convert_whole(&CEscape, b"\x01", &mut out);
        assert_eq!(step, ConvStep::new(1, 0, ConvStatus::Full));
    }

    #[test]
    fn stateless_finish_is_a_no_op() {
        let mut out = [0u8; 4];
        assert_eq!(
            BinToHex.finish(&mut (), &mut out),
            ConvStep::new(0, 0, ConvStatus::Complete)
        );
    }

    #[test]
    fn test_can_continue() {
        assert!(ConvStep::new(0, 0, ConvStatus::Full).can_continue());
        assert!(!ConvStep::new(0, 0, ConvStatus::Malformed).can_continue());
        assert!(!ConvStep::new(0, 0, ConvStatus::Incomplete).can_continue());
    }
}
