//! Integer to text rendering.
//!
//! Digits are generated least-significant first, separators are interleaved
//! as the run grows, and the finished run is reversed in place. Zero padding
//! digits are produced by the same loop as significant digits, so they share
//! the grouping cadence: `0xABCD` at width 8 with groups of 4 renders as
//! `000_ABCD`.

use super::NumeralError;

/// Digit alphabet shared by every radix.
pub const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Smallest supported radix.
pub const MIN_RADIX: u8 = 2;

/// Largest supported radix.
pub const MAX_RADIX: u8 = 36;

/// Group sizes at or above this value disable grouping.
pub const NO_GROUPING: u8 = 64;

/// Sign policy for signed rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignMode {
    /// No sign character; negative values render as their two's-complement
    /// bit pattern.
    Never,
    /// `-` for negative values, nothing otherwise.
    #[default]
    Negative,
    /// `-` for negative, `+` for positive, space for zero.
    Always,
    /// `-` for negative, space otherwise.
    Space,
}

/// Layout parameters for a rendered numeral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumeralStyle {
    /// Numeration base, `2..=36`.
    pub radix: u8,
    /// Minimum output length, separators and sign included.
    pub min_width: usize,
    /// Digits per group; `0` or anything `>= NO_GROUPING` disables grouping.
    pub group: u8,
    /// Separator byte placed between groups.
    pub separator: u8,
}

impl Default for NumeralStyle {
    fn default() -> Self {
        Self {
            radix: 10,
            min_width: 1,
            group: NO_GROUPING,
            separator: b'_',
        }
    }
}

impl NumeralStyle {
    /// Ungrouped style in the given radix.
    #[must_use]
    pub const fn radix(radix: u8) -> Self {
        Self {
            radix,
            min_width: 1,
            group: NO_GROUPING,
            separator: b'_',
        }
    }

    /// Set the minimum width.
    #[must_use]
    pub const fn with_width(mut self, min_width: usize) -> Self {
        self.min_width = min_width;
        self
    }

    /// Set the group size and separator.
    #[must_use]
    pub const fn with_grouping(mut self, group: u8, separator: u8) -> Self {
        self.group = group;
        self.separator = separator;
        self
    }

    fn group_len(&self) -> Option<u8> {
        (self.group != 0 && self.group < NO_GROUPING).then_some(self.group)
    }
}

/// Render an unsigned value into `out`, returning the number of bytes used.
///
/// At least one digit is always produced. A separator is only inserted when
/// another digit follows it.
pub fn render_u64(out: &mut [u8], value: u64, style: &NumeralStyle) -> Result<usize, NumeralError> {
    check_radix(style.radix)?;
    let radix = u64::from(style.radix);
    let group = style.group_len();
    let mut value = value;
    let mut len = 0;
    let mut in_group = 0u8;

    loop {
        let digit = (value % radix) as usize;
        value /= radix;
        push(out, &mut len, DIGITS[digit])?;
        if value == 0 && len >= style.min_width {
            break;
        }
        if let Some(group) = group {
            in_group += 1;
            if in_group == group {
                push(out, &mut len, style.separator)?;
                in_group = 0;
            }
        }
    }

    out[..len].reverse();
    Ok(len)
}

/// Render a signed value with a sign policy and an optional literal prefix.
///
/// The prefix is emitted after the sign and before the digits. The minimum
/// width covers sign, prefix and digits together.
pub fn render_i64(
    out: &mut [u8],
    value: i64,
    sign: SignMode,
    prefix: &[u8],
    style: &NumeralStyle,
) -> Result<usize, NumeralError> {
    let (negative, magnitude) = match sign {
        SignMode::Never => (false, value as u64),
        _ => (value < 0, value.unsigned_abs()),
    };
    render_sign_magnitude(out, negative, magnitude, sign, prefix, style)
}

/// Shared tail of signed rendering, also used for unsigned arguments that
/// still want a sign column.
pub(crate) fn render_sign_magnitude(
    out: &mut [u8],
    negative: bool,
    magnitude: u64,
    sign: SignMode,
    prefix: &[u8],
    style: &NumeralStyle,
) -> Result<usize, NumeralError> {
    check_radix(style.radix)?;
    let capacity = out.len();
    let sign_byte = match sign {
        SignMode::Never => None,
        SignMode::Negative => negative.then_some(b'-'),
        SignMode::Always if negative => Some(b'-'),
        SignMode::Always if magnitude == 0 => Some(b' '),
        SignMode::Always => Some(b'+'),
        SignMode::Space => Some(if negative { b'-' } else { b' ' }),
    };

    let mut len = 0;
    if let Some(byte) = sign_byte {
        push(out, &mut len, byte)?;
    }
    for &byte in prefix {
        push(out, &mut len, byte)?;
    }

    let body_style = NumeralStyle {
        min_width: style.min_width.saturating_sub(len),
        ..*style
    };
    let body = render_u64(&mut out[len..], magnitude, &body_style)
        .map_err(|_| NumeralError::BufferTooSmall { capacity })?;
    Ok(len + body)
}

fn check_radix(radix: u8) -> Result<(), NumeralError> {
    if (MIN_RADIX..=MAX_RADIX).contains(&radix) {
        Ok(())
    } else {
        Err(NumeralError::BadRadix(radix))
    }
}

fn push(out: &mut [u8], len: &mut usize, byte: u8) -> Result<(), NumeralError> {
    let capacity = out.len();
    match out.get_mut(*len) {
        Some(slot) => {
            *slot = byte;
            *len += 1;
            Ok(())
        }
        None => Err(NumeralError::BufferTooSmall { capacity }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(value: u64, style: NumeralStyle) -> String {
        let mut buf = [0u8; 160];
        let n = render_u64(&mut buf, value, &style).unwrap();
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    fn render_signed(value: i64, sign: SignMode, prefix: &[u8], style: NumeralStyle) -> String {
        let mut buf = [0u8; 160];
        let n = render_i64(&mut buf, value, sign, prefix, &style).unwrap();
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    #[test]
    fn test_decimal_basic() {
        assert_eq!(render(0, NumeralStyle::default()), "0");
        assert_eq!(render(42, NumeralStyle::default()), "42");
        assert_eq!(render(u64::MAX, NumeralStyle::default()), "18446744073709551615");
    }

    #[test]
    fn test_zero_width_still_emits_a_digit() {
        assert_eq!(render(0, NumeralStyle::radix(10).with_width(0)), "0");
    }

    #[test]
    fn test_uppercase_alphabet() {
        assert_eq!(render(0xDEAD_BEEF, NumeralStyle::radix(16)), "DEADBEEF");
        assert_eq!(render(35, NumeralStyle::radix(36)), "Z");
        assert_eq!(render(5, NumeralStyle::radix(2)), "101");
    }

    #[test]
    fn grouping_continues_across_zero_padding() {
        let style = NumeralStyle::radix(16).with_width(8).with_grouping(4, b'_');
        assert_eq!(render(0xABCD, style), "000_ABCD");
    }

    #[test]
    fn grouping_never_leads_with_a_separator() {
        let style = NumeralStyle::radix(10).with_grouping(3, b',');
        assert_eq!(render(123_456, style), "123,456");
        assert_eq!(render(1_234_567, style), "1,234,567");
        assert_eq!(render(12, style), "12");
    }

    #[test]
    fn separator_reaching_width_is_followed_by_a_digit() {
        let style = NumeralStyle::radix(16).with_width(5).with_grouping(4, b'_');
        assert_eq!(render(0x1234, style), "0_1234");
    }

    #[test]
    fn ungrouped_padding_past_255_digits() {
        let mut buf = [0u8; 512];
        let n = render_u64(&mut buf, 1, &NumeralStyle::radix(10).with_width(300)).unwrap();
        assert_eq!(n, 300);
        assert!(buf[..299].iter().all(|&b| b == b'0'));
        assert_eq!(buf[299], b'1');

        let style = NumeralStyle::radix(2).with_width(400).with_grouping(0, b'_');
        let n = render_u64(&mut buf, 5, &style).unwrap();
        assert_eq!(n, 400);
        assert_eq!(&buf[397..400], b"101");
    }

    #[test]
    fn grouped_padding_past_255_digits() {
        let mut buf = [0u8; 512];
        let style = NumeralStyle::radix(10).with_width(400).with_grouping(63, b'_');
        let n = render_u64(&mut buf, 7, &style).unwrap();
        assert_eq!(n, 400);
        assert_eq!(buf[0], b'0');
        assert_eq!(buf[399], b'7');
        assert_eq!(buf[..n].iter().filter(|&&b| b == b'_').count(), 6);
    }

    #[test]
    fn group_of_64_disables_grouping_even_for_long_padding() {
        let style = NumeralStyle::radix(2).with_width(70).with_grouping(64, b'_');
        let text = render(1, style);
        assert_eq!(text.len(), 70);
        assert!(!text.contains('_'));
    }

    #[test]
    fn test_sign_negative_with_width() {
        let style = NumeralStyle::radix(10).with_width(5);
        assert_eq!(render_signed(-52, SignMode::Negative, b"", style), "-0052");
        assert_eq!(render_signed(52, SignMode::Negative, b"", style), "00052");
    }

    #[test]
    fn test_sign_always() {
        let style = NumeralStyle::default();
        assert_eq!(render_signed(7, SignMode::Always, b"", style), "+7");
        assert_eq!(render_signed(0, SignMode::Always, b"", style), " 0");
        assert_eq!(render_signed(-7, SignMode::Always, b"", style), "-7");
    }

    #[test]
    fn test_sign_space() {
        let style = NumeralStyle::default();
        assert_eq!(render_signed(7, SignMode::Space, b"", style), " 7");
        assert_eq!(render_signed(0, SignMode::Space, b"", style), " 0");
        assert_eq!(render_signed(-7, SignMode::Space, b"", style), "-7");
    }

    #[test]
    fn negative_magnitude_is_the_absolute_value_for_every_sign_policy() {
        let style = NumeralStyle::default();
        for sign in [SignMode::Negative, SignMode::Always, SignMode::Space] {
            assert_eq!(render_signed(-1234, sign, b"", style), "-1234");
        }
    }

    #[test]
    fn test_i64_min() {
        let style = NumeralStyle::default();
        assert_eq!(
            render_signed(i64::MIN, SignMode::Negative, b"", style),
            "-9223372036854775808"
        );
        assert_eq!(
            render_signed(i64::MIN, SignMode::Always, b"", style),
            "-9223372036854775808"
        );
    }

    #[test]
    fn never_sign_renders_twos_complement() {
        let style = NumeralStyle::radix(16);
        assert_eq!(
            render_signed(-1, SignMode::Never, b"0x", style),
            "0xFFFFFFFFFFFFFFFF"
        );
    }

    #[test]
    fn prefix_counts_toward_width() {
        let style = NumeralStyle::radix(16).with_width(8);
        assert_eq!(render_signed(0xAB, SignMode::Negative, b"0x", style), "0x0000AB");
        assert_eq!(render_signed(-0xAB, SignMode::Negative, b"0x", style), "-0x000AB");
    }

    #[test]
    fn prefix_longer_than_width_floors_at_zero() {
        let style = NumeralStyle::radix(2).with_width(1);
        assert_eq!(render_signed(1, SignMode::Always, b"0b", style), "+0b1");
    }

    #[test]
    fn test_bad_radix() {
        let mut buf = [0u8; 8];
        assert_eq!(
            render_u64(&mut buf, 1, &NumeralStyle::radix(1)),
            Err(NumeralError::BadRadix(1))
        );
        assert_eq!(
            render_u64(&mut buf, 1, &NumeralStyle::radix(37)),
            Err(NumeralError::BadRadix(37))
        );
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 3];
        assert_eq!(
            render_u64(&mut buf, 1234, &NumeralStyle::default()),
            Err(NumeralError::BufferTooSmall { capacity: 3 })
        );
        assert_eq!(
            render_i64(&mut buf, -123, SignMode::Negative, b"", &NumeralStyle::default()),
            Err(NumeralError::BufferTooSmall { capacity: 3 })
        );
    }
}
