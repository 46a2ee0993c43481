//! Whole-buffer byte operations: hex dump, C escaping, C string views.

use crate::conv::{BinToHex, CEscape, ChunkConverter, ConvStatus, convert_whole, escaped_len};

/// Returns the prefix of `s` before its first NUL, or all of `s`.
#[must_use]
pub fn nul_terminated(s: &[u8]) -> &[u8] {
    let end = s.iter().position(|&b| b == 0).unwrap_or(s.len());
    &s[..end]
}

/// Writes uppercase hex of `src` into `dest`.
///
/// Encodes as many whole bytes as fit and returns the number of hex digits
/// written (always even).
pub fn hex_encode(dest: &mut [u8], src: &[u8]) -> usize {
    BinToHex.feed(&mut (), src, dest).produced
}

/// Length of the C-escaped form of `data`.
#[must_use]
pub fn c_escaped_len(data: &[u8]) -> usize {
    data.iter().map(|&b| escaped_len(b)).sum()
}

/// C-escapes `data` into `dest`.
///
/// Returns the escaped length, or `None` if `dest` is shorter than
/// [`c_escaped_len`]. Numeric escapes use octal only where a following hex
/// digit would otherwise be absorbed.
pub fn c_escape(dest: &mut [u8], data: &[u8]) -> Option<usize> {
    let step = convert_whole(&CEscape, data, dest);
    (step.status == ConvStatus::Complete).then_some(step.produced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nul_terminated() {
        assert_eq!(nul_terminated(b"abc\0def"), b"abc");
        assert_eq!(nul_terminated(b"abc"), b"abc");
        assert_eq!(nul_terminated(b"\0"), b"");
        assert_eq!(nul_terminated(b""), b"");
    }

    #[test]
    fn test_hex_encode() {
        let mut buf = [0u8; 8];
        assert_eq!(hex_encode(&mut buf, &[0xCA, 0xFE]), 4);
        assert_eq!(&buf[..4], b"CAFE");
    }

    #[test]
    fn hex_encode_truncates_to_whole_bytes() {
        let mut buf = [0u8; 3];
        assert_eq!(hex_encode(&mut buf, &[1, 2]), 2);
        assert_eq!(&buf[..2], b"01");
    }

    #[test]
    fn escaped_len_matches_escape_output() {
        let data = b"tab\there \"quoted\" \x00\x01z\xFF";
        let mut buf = [0u8; 64];
        let n = c_escape(&mut buf, data).unwrap();
        assert_eq!(n, c_escaped_len(data));
        assert_eq!(&buf[..n], b"tab\\there \\\"quoted\\\" \\x00\\x01z\\xFF");
    }

    #[test]
    fn test_c_escape_too_small() {
        let mut buf = [0u8; 3];
        assert_eq!(c_escape(&mut buf, b"\x01"), None);
        assert_eq!(c_escape(&mut buf, b"abcd"), None);
        assert_eq!(c_escape(&mut buf, b"abc"), Some(3));
    }
}
