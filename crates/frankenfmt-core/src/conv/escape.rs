//! C string-literal escaping.
//!
//! Printable ASCII passes through except `"`, `'` and `\`, which get a
//! backslash. BEL through CR use their letter escapes. Every other byte
//! becomes a numeric escape: octal `\ooo` when the next byte is a hex digit
//! (a `\x` escape would swallow it), `\xHH` otherwise. That choice needs one
//! byte of lookahead, which [`CEscape`] keeps in an [`EscapeState`] across
//! chunk boundaries.

use super::{ChunkConverter, ConvStatus, ConvStep, hex_value, put};
use crate::numeral::DIGITS;

const LETTER_ESCAPES: &[u8; 7] = b"abtnvfr";

enum Class {
    Plain,
    Short(u8),
    Numeric,
}

fn classify(byte: u8) -> Class {
    match byte {
        7..=13 => Class::Short(LETTER_ESCAPES[usize::from(byte - 7)]),
        b'"' | b'\'' | b'\\' => Class::Short(byte),
        0x20..=0x7E => Class::Plain,
        _ => Class::Numeric,
    }
}

/// Length of the escaped form of one byte: 1, 2 or 4.
#[must_use]
pub fn escaped_len(byte: u8) -> usize {
    match classify(byte) {
        Class::Plain => 1,
        Class::Short(_) => 2,
        Class::Numeric => 4,
    }
}

fn hex_escape(byte: u8) -> [u8; 4] {
    [
        b'\\',
        b'x',
        DIGITS[usize::from(byte >> 4)],
        DIGITS[usize::from(byte & 0x0F)],
    ]
}

fn octal_escape(byte: u8) -> [u8; 4] {
    [
        b'\\',
        b'0' + (byte >> 6),
        b'0' + ((byte >> 3) & 7),
        b'0' + (byte & 7),
    ]
}

/// Lookahead held by [`CEscape`] between chunks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EscapeState {
    #[default]
    Empty,
    /// A byte that needs a numeric escape, waiting to see what follows it.
    Pending(u8),
}

/// C escaping that picks octal or hex per byte to keep the output
/// unambiguous.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CEscape;

impl ChunkConverter for CEscape {
    type State = EscapeState;

    fn feed(&self, state: &mut EscapeState, input: &[u8], output: &mut [u8]) -> ConvStep {
        let mut i = 0;
        let mut o = 0;
        loop {
            let (byte, next_at) = match *state {
                EscapeState::Pending(byte) => (byte, i),
                EscapeState::Empty => match input.get(i) {
                    Some(&byte) => (byte, i + 1),
                    None => return ConvStep::new(i, o, ConvStatus::Complete),
                },
            };
            let written = match classify(byte) {
                Class::Plain => put(output, o, &[byte]),
                Class::Short(letter) => put(output, o, &[b'\\', letter]),
                Class::Numeric => {
                    let Some(&next) = input.get(next_at) else {
                        *state = EscapeState::Pending(byte);
                        return ConvStep::new(next_at, o, ConvStatus::Complete);
                    };
                    if hex_value(next).is_some() {
                        put(output, o, &octal_escape(byte))
                    } else {
                        put(output, o, &hex_escape(byte))
                    }
                }
            };
            let Some(n) = written else {
                return ConvStep::new(i, o, ConvStatus::Full);
            };
            o += n;
            i = next_at;
            *state = EscapeState::Empty;
        }
    }

    fn finish(&self, state: &mut EscapeState, output: &mut [u8]) -> ConvStep {
        let EscapeState::Pending(byte) = *state else {
            return ConvStep::new(0, 0, ConvStatus::Complete);
        };
        match put(output, 0, &hex_escape(byte)) {
            Some(n) => {
                *state = EscapeState::Empty;
                ConvStep::new(0, n, ConvStatus::Complete)
            }
            None => ConvStep::new(0, 0, ConvStatus::Full),
        }
    }
}

/// C escaping that always uses `\xHH` for numeric escapes. Stateless.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CEscapeForceHex;

impl ChunkConverter for CEscapeForceHex {
    type State = ();

    fn feed(&self, _state: &mut (), input: &[u8], output: &mut [u8]) -> ConvStep {
        let mut o = 0;
        for (i, &byte) in input.iter().enumerate() {
            let written = match classify(byte) {
                Class::Plain => put(output, o, &[byte]),
                Class::Short(letter) => put(output, o, &[b'\\', letter]),
                Class::Numeric => put(output, o, &hex_escape(byte)),
            };
            match written {
                Some(n) => o += n,
                None => return ConvStep::new(i, o, ConvStatus::Full),
            }
        }
        ConvStep::new(input.len(), o, ConvStatus::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_all(input: &[u8]) -> Vec<u8> {
        let mut out = vec![0u8; input.len() * 4];
        let mut state = EscapeState::Empty;
        let step = CEscape.feed(&mut state, input, &mut out);
        assert_eq!(step.status, ConvStatus::Complete);
        assert_eq!(step.consumed, input.len());
        let tail = CEscape.finish(&mut state, &mut out[step.produced..]);
        assert_eq!(tail.status, ConvStatus::Complete);
        out.truncate(step.produced + tail.produced);
        out
    }

    #[test]
    fn test_plain_and_short_escapes() {
        assert_eq!(escape_all(b"hi there"), b"hi there");
        assert_eq!(escape_all(b"a\tb\n"), b"a\\tb\\n");
        assert_eq!(escape_all(b"\x07\x0B\x0C\r"), b"\\a\\v\\f\\r");
        assert_eq!(escape_all(b"\"q\" 'x' \\"), b"\\\"q\\\" \\'x\\' \\\\");
    }

    #[test]
    fn numeric_escape_chooses_octal_before_hex_digit() {
        assert_eq!(escape_all(b"\x01A"), b"\\001A");
        assert_eq!(escape_all(b"\x01f"), b"\\001f");
        assert_eq!(escape_all(b"\x01g"), b"\\x01g");
        assert_eq!(escape_all(b"\xFF."), b"\\xFF.");
        assert_eq!(escape_all(b"\xFF9"), b"\\3779");
    }

    #[test]
    fn trailing_numeric_escape_is_flushed_as_hex() {
        assert_eq!(escape_all(b"end\x00"), b"end\\x00");
        assert_eq!(escape_all(b"\x7F"), b"\\x7F");
    }

    #[test]
    fn pending_byte_crosses_chunk_boundary() {
        let mut state = EscapeState::Empty;
        let mut out = [0u8; 16];

        let first = CEscape.feed(&mut state, b"x\x1B", &mut out);
        assert_eq!(first, ConvStep::new(2, 1, ConvStatus::Complete));
        assert_eq!(state, EscapeState::Pending(0x1B));

        let second = CEscape.feed(&mut state, b"1", &mut out[1..]);
        assert_eq!(second, ConvStep::new(1, 5, ConvStatus::Complete));
        assert_eq!(&out[..6], b"x\\0331");
        assert_eq!(state, EscapeState::Empty);
    }

    #[test]
    fn test_full_keeps_position() {
        let mut state = EscapeState::Empty;
        let mut out = [0u8; 3];
        let step = CEscape.feed(&mut state, b"ab\n", &mut out);
        assert_eq!(step, ConvStep::new(2, 2, ConvStatus::Full));
        assert_eq!(state, EscapeState::Empty);

        let step = CEscape.feed(&mut state, b"\n", &mut out);
        assert_eq!(step, ConvStep::new(1, 2, ConvStatus::Complete));
        assert_eq!(&out[..2], b"\\n");
    }

    #[test]
    fn full_with_pending_byte_keeps_it_pending() {
        let mut state = EscapeState::Pending(0x02);
        let mut out = [0u8; 2];
        let step = CEscape.feed(&mut state, b"z", &mut out);
        assert_eq!(step, ConvStep::new(0, 0, ConvStatus::Full));
        assert_eq!(state, EscapeState::Pending(0x02));
    }

    #[test]
    fn test_finish_needs_four_bytes() {
        let mut state = EscapeState::Pending(0xC3);
        let mut small = [0u8; 3];
        assert_eq!(
            CEscape.finish(&mut state, &mut small),
            ConvStep::new(0, 0, ConvStatus::Full)
        );
        let mut out = [0u8; 4];
        assert_eq!(
            CEscape.finish(&mut state, &mut out),
            ConvStep::new(0, 4, ConvStatus::Complete)
        );
        assert_eq!(&out, b"\\xC3");
        assert_eq!(state, EscapeState::Empty);
    }

    #[test]
    fn test_force_hex() {
        let mut out = [0u8; 32];
        let step = CEscapeForceHex.feed(&mut (), b"\x01A\t\xE2", &mut out);
        assert_eq!(step, ConvStep::new(4, 11, ConvStatus::Complete));
        assert_eq!(&out[..11], b"\\x01A\\t\\xE2");
    }

    #[test]
    fn force_hex_stops_before_a_partial_escape() {
        let mut out = [0u8; 5];
        let step = CEscapeForceHex.feed(&mut (), b"a\x01b", &mut out);
        assert_eq!(step, ConvStep::new(2, 5, ConvStatus::Full));
        let step = CEscapeForceHex.feed(&mut (), b"a\x01", &mut out[..4]);
        assert_eq!(step, ConvStep::new(1, 1, ConvStatus::Full));
    }

    #[test]
    fn test_escaped_len() {
        assert_eq!(escaped_len(b'a'), 1);
        assert_eq!(escaped_len(b'\n'), 2);
        assert_eq!(escaped_len(b'\\'), 2);
        assert_eq!(escaped_len(0x00), 4);
        assert_eq!(escaped_len(0x7F), 4);
        assert_eq!(escaped_len(0x80), 4);
    }
}
