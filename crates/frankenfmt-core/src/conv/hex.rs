//! Hex text to bytes and back.

use super::{ChunkConverter, ConvStatus, ConvStep};
use crate::numeral::{DIGITS, digit_from_char};

/// Value of one hex digit, either case.
#[must_use]
pub fn hex_value(byte: u8) -> Option<u8> {
    digit_from_char(u32::from(byte), 16)
}

/// Decodes pairs of hex digits into bytes.
///
/// Bytes listed in `skip` are ignored between pairs, never between the two
/// digits of one pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HexToBin<'a> {
    pub skip: &'a [u8],
}

impl<'a> HexToBin<'a> {
    #[must_use]
    pub const fn skipping(skip: &'a [u8]) -> Self {
        Self { skip }
    }
}

impl ChunkConverter for HexToBin<'_> {
    type State = ();

    fn feed(&self, _state: &mut (), input: &[u8], output: &mut [u8]) -> ConvStep {
        let mut i = 0;
        let mut o = 0;
        while let Some(&byte) = input.get(i) {
            let Some(hi) = hex_value(byte) else {
                if self.skip.contains(&byte) {
                    i += 1;
                    continue;
                }
                return ConvStep::new(i, o, ConvStatus::Malformed);
            };
            let Some(&low_byte) = input.get(i + 1) else {
                return ConvStep::new(i, o, ConvStatus::Incomplete);
            };
            let Some(lo) = hex_value(low_byte) else {
                return ConvStep::new(i + 1, o, ConvStatus::Malformed);
            };
            let Some(slot) = output.get_mut(o) else {
                return ConvStep::new(i, o, ConvStatus::Full);
            };
            *slot = (hi << 4) | lo;
            o += 1;
            i += 2;
        }
        ConvStep::new(i, o, ConvStatus::Complete)
    }
}

/// Encodes bytes as uppercase hex pairs with no separators.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BinToHex;

impl ChunkConverter for BinToHex {
    type State = ();

    fn feed(&self, _state: &mut (), input: &[u8], output: &mut [u8]) -> ConvStep {
        let count = input.len().min(output.len() / 2);
        for (pair, &byte) in output.chunks_exact_mut(2).zip(&input[..count]) {
            pair[0] = DIGITS[usize::from(byte >> 4)];
            pair[1] = DIGITS[usize::from(byte & 0x0F)];
        }
        let status = if count == input.len() {
            ConvStatus::Complete
        } else {
            ConvStatus::Full
        };
        ConvStep::new(count, count * 2, status)
    }
}
