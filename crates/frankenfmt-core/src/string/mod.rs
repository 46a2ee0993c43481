//! Byte string helpers built on the numeral and converter modules.

pub mod bytes;

pub use crate::numeral::digit_from_char;
pub use bytes::{c_escape, c_escaped_len, hex_encode, nul_terminated};
