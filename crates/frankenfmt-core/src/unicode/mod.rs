//! Unicode primitives: UTF-8 validation and single code point codec,
//! terminal display width, and UTF-16LE to UTF-8 transcoding.

mod utf16;
mod utf8;
mod width;

pub use utf8::{
    CodePoints, MAX_ENCODABLE, Utf8Error, Utf8ErrorKind, code_points, decode_valid, encode,
    encoded_len, validate,
};
pub use utf16::{Utf16Error, Utf16Flags, utf16le_to_utf8, utf16le_to_utf8_len};
pub use width::{ByteWidth, TermWidth, WidthError, WidthMeasure, ucp_term_width, utf8_term_width};
