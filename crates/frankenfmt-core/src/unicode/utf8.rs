//! UTF-8 validation, encoding and decoding.
//!
//! Validation follows RFC 3629: overlong forms, UTF-16 surrogates and code
//! points above U+10FFFF are rejected. The encoder is deliberately wider and
//! accepts anything up to [`MAX_ENCODABLE`], so callers can build CESU-style
//! or modified UTF-8 output on top of it.

use thiserror::Error;

/// Largest value [`encode`] accepts.
pub const MAX_ENCODABLE: u32 = 0x1F_FFFF;

/// Classification of a UTF-8 validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Utf8ErrorKind {
    /// The last sequence runs past the end of the input.
    #[error("unterminated sequence")]
    Unterminated,
    /// A continuation byte or `F8..FF` where a lead byte was expected.
    #[error("malformed start byte")]
    MalformedStart,
    /// A lead byte followed by a byte that is not `10xxxxxx`.
    #[error("malformed continuation byte")]
    MalformedContinuation,
    /// Encoded UTF-16 surrogate (U+D800..U+DFFF).
    #[error("encoded surrogate")]
    Surrogate,
    /// A code point encoded with more bytes than needed.
    #[error("overlong encoding")]
    Overlong,
    /// A four-byte sequence above U+10FFFF.
    #[error("code point above U+10FFFF")]
    OutOfRange,
}

/// UTF-8 validation failure with the length of the valid prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid UTF-8 at byte {valid_len}: {kind}")]
pub struct Utf8Error {
    pub kind: Utf8ErrorKind,
    /// Bytes before the offending sequence; `data[..valid_len]` is valid.
    pub valid_len: usize,
}

/// Validate a whole buffer.
pub fn validate(data: &[u8]) -> Result<(), Utf8Error> {
    let mut i = 0;
    while i < data.len() {
        match sequence_len(&data[i..]) {
            Ok(len) => i += len,
            Err(kind) => return Err(Utf8Error { kind, valid_len: i }),
        }
    }
    Ok(())
}

/// Length of the well-formed sequence at the start of a non-empty slice.
fn sequence_len(bytes: &[u8]) -> Result<usize, Utf8ErrorKind> {
    let lead = bytes[0];
    let need = match lead {
        0x00..=0x7F => return Ok(1),
        0x80..=0xBF | 0xF8..=0xFF => return Err(Utf8ErrorKind::MalformedStart),
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    };

    let available = &bytes[1..bytes.len().min(need)];
    if available.iter().any(|&b| b & 0xC0 != 0x80) {
        return Err(Utf8ErrorKind::MalformedContinuation);
    }
    if bytes.len() < need {
        return Err(Utf8ErrorKind::Unterminated);
    }

    match (lead, bytes[1]) {
        (0xC0 | 0xC1, _) | (0xE0, 0x80..=0x9F) | (0xF0, 0x80..=0x8F) => {
            Err(Utf8ErrorKind::Overlong)
        }
        (0xED, 0xA0..=0xBF) => Err(Utf8ErrorKind::Surrogate),
        (0xF4, 0x90..=0xBF) | (0xF5..=0xF7, _) => Err(Utf8ErrorKind::OutOfRange),
        _ => Ok(need),
    }
}

/// Number of bytes [`encode`] writes for `cp`, or `None` above
/// [`MAX_ENCODABLE`].
#[must_use]
pub const fn encoded_len(cp: u32) -> Option<usize> {
    match cp {
        0..=0x7F => Some(1),
        0x80..=0x7FF => Some(2),
        0x800..=0xFFFF => Some(3),
        0x1_0000..=MAX_ENCODABLE => Some(4),
        _ => None,
    }
}

/// Encode one code point. Surrogates are encoded as-is.
///
/// Returns the byte count, or `None` when `cp` is above [`MAX_ENCODABLE`]
/// or `out` is too short.
pub fn encode(out: &mut [u8], cp: u32) -> Option<usize> {
    let len = encoded_len(cp)?;
    let out = out.get_mut(..len)?;
    match len {
        1 => out[0] = cp as u8,
        2 => {
            out[0] = 0xC0 | (cp >> 6) as u8;
            out[1] = 0x80 | (cp & 0x3F) as u8;
        }
        3 => {
            out[0] = 0xE0 | (cp >> 12) as u8;
            out[1] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            out[2] = 0x80 | (cp & 0x3F) as u8;
        }
        _ => {
            out[0] = 0xF0 | (cp >> 18) as u8;
            out[1] = 0x80 | ((cp >> 12) & 0x3F) as u8;
            out[2] = 0x80 | ((cp >> 6) & 0x3F) as u8;
            out[3] = 0x80 | (cp & 0x3F) as u8;
        }
    }
    Some(len)
}

/// Decode the first code point of already-validated input.
///
/// Returns the code point and its byte length. Garbage in gives garbage out,
/// but never a panic: a truncated sequence yields `None`.
#[must_use]
pub fn decode_valid(data: &[u8]) -> Option<(u32, usize)> {
    let lead = u32::from(*data.first()?);
    let (len, init) = match lead {
        0x00..=0x7F => return Some((lead, 1)),
        0x80..=0xDF => (2, lead & 0x1F),
        0xE0..=0xEF => (3, lead & 0x0F),
        _ => (4, lead & 0x07),
    };
    let tail = data.get(1..len)?;
    let cp = tail
        .iter()
        .fold(init, |acc, &b| (acc << 6) | u32::from(b & 0x3F));
    Some((cp, len))
}

/// Iterator over the code points of validated UTF-8.
#[derive(Debug, Clone)]
pub struct CodePoints<'a> {
    rest: &'a [u8],
}

/// Iterate the code points of validated UTF-8. Iteration ends early if the
/// input turns out to be truncated.
#[must_use]
pub fn code_points(valid: &[u8]) -> CodePoints<'_> {
    CodePoints { rest: valid }
}

impl Iterator for CodePoints<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let (cp, len) = decode_valid(self.rest)?;
        self.rest = &self.rest[len..];
        Some(cp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(kind: Utf8ErrorKind, valid_len: usize) -> Result<(), Utf8Error> {
        Err(Utf8Error { kind, valid_len })
    }

    #[test]
    fn test_validate_accepts_std_utf8() {
        assert_eq!(validate(b""), Ok(()));
        assert_eq!(validate("plain ascii".as_bytes()), Ok(()));
        assert_eq!(validate("ş中😀\u{10FFFF}".as_bytes()), Ok(()));
    }

    #[test]
    fn test_overlong() {
        assert_eq!(validate(&[0xC0, 0x80]), err(Utf8ErrorKind::Overlong, 0));
        assert_eq!(validate(&[0xC1, 0xBF]), err(Utf8ErrorKind::Overlong, 0));
        assert_eq!(validate(&[0xE0, 0x9F, 0xBF]), err(Utf8ErrorKind::Overlong, 0));
        assert_eq!(
            validate(&[b'a', 0xF0, 0x8F, 0xBF, 0xBF]),
            err(Utf8ErrorKind::Overlong, 1)
        );
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(validate(&[0xE2]), err(Utf8ErrorKind::Unterminated, 0));
        assert_eq!(validate(&[b'x', 0xE2, 0x82]), err(Utf8ErrorKind::Unterminated, 1));
        assert_eq!(validate(&[0xF0, 0x9F]), err(Utf8ErrorKind::Unterminated, 0));
    }

    #[test]
    fn bad_continuation_wins_over_truncation() {
        assert_eq!(
            validate(&[0xE2, b'a']),
            err(Utf8ErrorKind::MalformedContinuation, 0)
        );
        assert_eq!(
            validate(&[b'o', b'k', 0xC3, 0x28]),
            err(Utf8ErrorKind::MalformedContinuation, 2)
        );
    }

    #[test]
    fn test_malformed_start() {
        assert_eq!(validate(&[0x80]), err(Utf8ErrorKind::MalformedStart, 0));
        assert_eq!(validate(&[b'a', 0xBF]), err(Utf8ErrorKind::MalformedStart, 1));
        assert_eq!(validate(&[0xF8, 0x80, 0x80]), err(Utf8ErrorKind::MalformedStart, 0));
        assert_eq!(validate(&[0xFF]), err(Utf8ErrorKind::MalformedStart, 0));
    }

    #[test]
    fn test_surrogate() {
        assert_eq!(validate(&[0xED, 0xA0, 0x80]), err(Utf8ErrorKind::Surrogate, 0));
        assert_eq!(validate(&[0xED, 0x9F, 0xBF]), Ok(()));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            validate(&[0xF4, 0x90, 0x80, 0x80]),
            err(Utf8ErrorKind::OutOfRange, 0)
        );
        assert_eq!(
            validate(&[0xF5, 0x80, 0x80, 0x80]),
            err(Utf8ErrorKind::OutOfRange, 0)
        );
    }

    #[test]
    fn validate_agrees_with_std_on_every_two_byte_pair() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                let pair = [a, b];
                assert_eq!(
                    validate(&pair).is_ok(),
                    std::str::from_utf8(&pair).is_ok(),
                    "{a:02X} {b:02X}"
                );
            }
        }
    }

    #[test]
    fn test_encode_matches_std() {
        let mut ours = [0u8; 4];
        let mut theirs = [0u8; 4];
        for ch in ['\0', 'a', '\u{7F}', '\u{80}', 'ş', '\u{7FF}', '\u{800}', '中', '\u{FFFF}', '😀', '\u{10FFFF}'] {
            let n = encode(&mut ours, ch as u32).unwrap();
            let expected = ch.encode_utf8(&mut theirs).as_bytes();
            assert_eq!(&ours[..n], expected);
        }
    }

    #[test]
    fn test_encode_limits() {
        let mut buf = [0u8; 4];
        assert_eq!(encode(&mut buf, 0xD800), Some(3));
        assert_eq!(buf[..3], [0xED, 0xA0, 0x80]);
        assert_eq!(encode(&mut buf, MAX_ENCODABLE), Some(4));
        assert_eq!(encode(&mut buf, MAX_ENCODABLE + 1), None);
        assert_eq!(encode(&mut buf[..2], 0x800), None);
    }

    #[test]
    fn test_decode_valid() {
        assert_eq!(decode_valid(b"A"), Some((0x41, 1)));
        assert_eq!(decode_valid("中x".as_bytes()), Some((0x4E2D, 3)));
        assert_eq!(decode_valid("😀".as_bytes()), Some((0x1F600, 4)));
        assert_eq!(decode_valid(&[0xE4, 0xB8]), None);
        assert_eq!(decode_valid(b""), None);
    }

    #[test]
    fn code_points_walks_the_buffer() {
        let cps: Vec<u32> = code_points("aş中😀".as_bytes()).collect();
        assert_eq!(cps, vec![0x61, 0x15F, 0x4E2D, 0x1F600]);
    }
}
