//! Shared inputs for the frankenfmt benchmarks.

#![forbid(unsafe_code)]

/// Mixed-script text of roughly `len` bytes: ASCII, Latin-1, CJK and emoji.
#[must_use]
pub fn mixed_text(len: usize) -> String {
    const PIECES: [&str; 4] = ["plain ascii ", "größe ", "漢字テキスト ", "🦀 "];
    let mut out = String::with_capacity(len + 16);
    let mut i = 0;
    while out.len() < len {
        out.push_str(PIECES[i % PIECES.len()]);
        i += 1;
    }
    out
}

/// Every non-NUL byte value, repeated to `len`. NUL is left out because an
/// unbounded `$s` stops at it.
#[must_use]
pub fn all_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 255 + 1) as u8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_text_reaches_length() {
        let text = mixed_text(100);
        assert!(text.len() >= 100);
        assert!(text.contains('漢'));
    }

    #[test]
    fn all_bytes_cycles() {
        let bytes = all_bytes(300);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[254], 255);
        assert_eq!(bytes[255], 1);
        assert!(!bytes.contains(&0));
    }
}
