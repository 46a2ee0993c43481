//! UTF-16LE to UTF-8 transcoding, with switches for modified UTF-8 (two-byte
//! NUL, surrogates encoded one by one) and for tolerating broken pairs.

use core::ops::BitOr;

use thiserror::Error;

use super::utf8::{encode, encoded_len};

/// Transcoding switches. Combine with `|`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Utf16Flags(u8);

impl Utf16Flags {
    pub const NONE: Self = Self(0);
    /// Encode U+0000 as `C0 80`.
    pub const TWO_BYTE_NUL: Self = Self(1);
    /// Encode lone surrogates as three-byte sequences instead of failing.
    pub const ALLOW_UNPAIRED_SURROGATES: Self = Self(2);
    /// Never combine surrogate pairs; each half is encoded on its own.
    pub const NEVER_PAIR_SURROGATES: Self = Self(4);
    /// Java-style modified UTF-8.
    pub const MUTF8: Self = Self(Self::TWO_BYTE_NUL.0 | Self::NEVER_PAIR_SURROGATES.0);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for Utf16Flags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Utf16Error {
    #[error("UTF-16 input has an odd byte length")]
    OddLength,
    #[error("unpaired surrogate at byte offset {offset}")]
    UnpairedSurrogate { offset: usize },
    #[error("UTF-8 output length overflows")]
    Overflow,
    #[error("output buffer holds {capacity} bytes but {needed} are required")]
    BufferTooSmall { needed: usize, capacity: usize },
}

fn unit_at(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
}

const fn is_surrogate(unit: u16) -> bool {
    unit & 0xF800 == 0xD800
}

const fn is_high_surrogate(unit: u16) -> bool {
    unit & 0xFC00 == 0xD800
}

const fn is_low_surrogate(unit: u16) -> bool {
    unit & 0xFC00 == 0xDC00
}

/// Visit every code point the input decodes to under `flags`. Unpaired or
/// unpaired-by-request surrogates are passed through as their raw value.
fn walk(
    data: &[u8],
    flags: Utf16Flags,
    mut visit: impl FnMut(u32) -> Result<(), Utf16Error>,
) -> Result<(), Utf16Error> {
    if data.len() % 2 != 0 {
        return Err(Utf16Error::OddLength);
    }
    let mut i = 0;
    while let Some(unit) = unit_at(data, i) {
        let offset = i;
        i += 2;
        if !is_surrogate(unit) || flags.contains(Utf16Flags::NEVER_PAIR_SURROGATES) {
            visit(u32::from(unit))?;
            continue;
        }
        if is_high_surrogate(unit) {
            if let Some(low) = unit_at(data, i).filter(|&u| is_low_surrogate(u)) {
                i += 2;
                let cp = 0x1_0000 + ((u32::from(unit) & 0x3FF) << 10) + (u32::from(low) & 0x3FF);
                visit(cp)?;
                continue;
            }
        }
        if !flags.contains(Utf16Flags::ALLOW_UNPAIRED_SURROGATES) {
            return Err(Utf16Error::UnpairedSurrogate { offset });
        }
        visit(u32::from(unit))?;
    }
    Ok(())
}

fn piece_len(cp: u32, flags: Utf16Flags) -> usize {
    if cp == 0 && flags.contains(Utf16Flags::TWO_BYTE_NUL) {
        2
    } else {
        // Everything reaching here is at most U+10FFFF.
        encoded_len(cp).unwrap_or(4)
    }
}

/// Size in bytes of the UTF-8 form of `data`.
pub fn utf16le_to_utf8_len(data: &[u8], flags: Utf16Flags) -> Result<usize, Utf16Error> {
    let mut total: usize = 0;
    walk(data, flags, |cp| {
        total = total
            .checked_add(piece_len(cp, flags))
            .filter(|&t| isize::try_from(t).is_ok())
            .ok_or(Utf16Error::Overflow)?;
        Ok(())
    })?;
    Ok(total)
}

/// Transcode `data` into `out`, returning the number of bytes written.
///
/// Nothing is written unless the whole result fits.
pub fn utf16le_to_utf8(out: &mut [u8], data: &[u8], flags: Utf16Flags) -> Result<usize, Utf16Error> {
    let needed = utf16le_to_utf8_len(data, flags)?;
    if needed > out.len() {
        return Err(Utf16Error::BufferTooSmall {
            needed,
            capacity: out.len(),
        });
    }
    let mut len = 0;
    walk(data, flags, |cp| {
        let slot = &mut out[len..];
        if cp == 0 && flags.contains(Utf16Flags::TWO_BYTE_NUL) {
            slot[..2].copy_from_slice(&[0xC0, 0x80]);
            len += 2;
        } else {
            len += encode(slot, cp).ok_or(Utf16Error::Overflow)?;
        }
        Ok(())
    })?;
    Ok(len)
}
