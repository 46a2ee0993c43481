//! # frankenfmt-core
//!
//! Freestanding text primitives: numeral rendering and parsing, UTF-8
//! validation and terminal width, chunked streaming converters, and a
//! template-driven formatter that writes through a caller-supplied sink.
//!
//! Nothing in this crate allocates on the formatting path. Every buffer is
//! either supplied by the caller or lives on the stack of a single call.

#![deny(unsafe_code)]

pub mod conv;
pub mod numeral;
pub mod stdio;
pub mod string;
pub mod unicode;

pub use conv::{ChunkConverter, ConvStatus, ConvStep};
pub use numeral::{NumeralError, NumeralStyle, ParseStatus, ParsedU64, SignMode};
pub use stdio::{
    Arg, ArgProblem, ByteSink, Converted, FnSink, FormatError, FormatErrorKind, IoSink, SinkError,
    SliceSink, StreamConverter, format_io, format_to, format_to_vec,
};
pub use unicode::{ByteWidth, TermWidth, Utf8Error, Utf8ErrorKind, WidthError, WidthMeasure};
