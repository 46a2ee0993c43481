//! Typed format arguments.

use std::fmt;

use super::engine::{FormatErrorKind, drive};
use crate::conv::ChunkConverter;

/// One argument for a template directive.
///
/// Every integer conversion accepts exactly one variant; see
/// [`IntKind`](super::printf::IntKind).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg<'a> {
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    Usize(usize),
    Isize(isize),
    /// Raw code point; checked when it is formatted.
    Char(u32),
    Str(&'a [u8]),
    /// Bytes for a plain `s` directive, streamed through a caller's
    /// converter instead of being written verbatim.
    Converted(Converted<'a>),
}

/// Object-safe face of a [`ChunkConverter`].
///
/// Every `ChunkConverter` gets this for free. The engine calls it once to
/// estimate the display width (only when padding is requested) and once to
/// emit, each time from a fresh converter state.
pub trait StreamConverter {
    /// Feed all of `data` in `scratch`-sized steps, hand each produced chunk
    /// to `chunk`, then finish. A step that produces nothing and consumes
    /// nothing, or any status other than complete or full, is an error.
    fn stream(
        &self,
        data: &[u8],
        scratch: &mut [u8],
        chunk: &mut dyn FnMut(&[u8]) -> Result<(), FormatErrorKind>,
    ) -> Result<(), FormatErrorKind>;
}

impl<C: ChunkConverter> StreamConverter for C {
    fn stream(
        &self,
        data: &[u8],
        scratch: &mut [u8],
        chunk: &mut dyn FnMut(&[u8]) -> Result<(), FormatErrorKind>,
    ) -> Result<(), FormatErrorKind> {
        drive(self, data, scratch, chunk)
    }
}

/// Input bytes paired with the converter that renders them.
#[derive(Clone, Copy)]
pub struct Converted<'a> {
    pub data: &'a [u8],
    pub conv: &'a dyn StreamConverter,
}

impl<'a> Converted<'a> {
    #[must_use]
    pub fn new(conv: &'a dyn StreamConverter, data: &'a [u8]) -> Self {
        Self { data, conv }
    }
}

impl fmt::Debug for Converted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converted")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

/// Same bytes through the same converter object.
impl PartialEq for Converted<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && std::ptr::addr_eq(self.conv, other.conv)
    }
}

impl Eq for Converted<'_> {}

impl<'a> Arg<'a> {
    /// Stream `data` through `conv` when the directive is formatted.
    #[must_use]
    pub fn converted(conv: &'a dyn StreamConverter, data: &'a [u8]) -> Self {
        Arg::Converted(Converted::new(conv, data))
    }
}

macro_rules! arg_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Arg<'_> {
                fn from(value: $ty) -> Self {
                    Arg::$variant(value)
                }
            }
        )*
    };
}

arg_from! {
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    usize => Usize,
    isize => Isize,
}

impl From<char> for Arg<'_> {
    fn from(value: char) -> Self {
        Arg::Char(u32::from(value))
    }
}

impl<'a> From<&'a [u8]> for Arg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Arg::Str(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Arg<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Arg::Str(value)
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(value: &'a str) -> Self {
        Arg::Str(value.as_bytes())
    }
}

/// Build an argument array, converting each expression with `Arg::from`.
///
/// ```
/// use frankenfmt_core::{fmt_args, format_to_vec};
///
/// let out = format_to_vec(b"$s=$d", &fmt_args!["n", 7u32]).unwrap();
/// assert_eq!(out, b"n=7\0");
/// ```
#[macro_export]
macro_rules! fmt_args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Arg::from($arg)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conv::BinToHex;

    #[test]
    fn test_conversions() {
        assert_eq!(Arg::from(7u8), Arg::U8(7));
        assert_eq!(Arg::from(-7i64), Arg::I64(-7));
        assert_eq!(Arg::from('é'), Arg::Char(0xE9));
        assert_eq!(Arg::from("hi"), Arg::Str(b"hi"));
        assert_eq!(Arg::from(b"raw"), Arg::Str(b"raw"));
    }

    #[test]
    fn converted_args_compare_by_converter_identity() {
        let hex = BinToHex;
        let a = Arg::converted(&hex, b"ab");
        assert_eq!(a, Arg::converted(&hex, b"ab"));
        assert_ne!(a, Arg::converted(&hex, b"ba"));
        assert_ne!(a, Arg::Str(b"ab"));
        assert!(format!("{a:?}").starts_with("Converted(Converted { data: [97, 98]"));
    }

    #[test]
    fn macro_builds_an_array() {
        let args = fmt_args![1u16, "x", 'z'];
        assert_eq!(args, [Arg::U16(1), Arg::Str(b"x"), Arg::Char(0x7A)]);
    }
}
