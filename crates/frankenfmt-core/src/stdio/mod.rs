//! Formatted output.
//!
//! [`format_to`] interprets a `$`-directive template against typed
//! arguments and streams the result into any [`ByteSink`]. Directive syntax
//! is described in [`printf`].

mod arg;
mod engine;
pub mod printf;
mod scratch;
mod sink;

use std::io;

pub use arg::{Arg, Converted, StreamConverter};
pub use engine::{ArgProblem, FormatError, FormatErrorKind, format_to};
pub use scratch::{SCRATCH_CAPACITY, Scratch, ScratchFull};
pub use sink::{ByteSink, FnSink, IoSink, SinkError, SliceSink};

use crate::unicode::TermWidth;

/// Format into a fresh vector using terminal widths. The trailing NUL is
/// part of the result.
pub fn format_to_vec(template: &[u8], args: &[Arg<'_>]) -> Result<Vec<u8>, FormatError> {
    let mut out = Vec::with_capacity(template.len() + 1);
    format_to(&mut out, &mut TermWidth, template, args)?;
    Ok(out)
}

/// Format into an [`io::Write`] using terminal widths.
///
/// I/O failures come back as the writer's own error; template and argument
/// problems as [`io::ErrorKind::InvalidInput`].
pub fn format_io<W: io::Write>(writer: W, template: &[u8], args: &[Arg<'_>]) -> io::Result<usize> {
    let mut sink = IoSink::new(writer);
    format_to(&mut sink, &mut TermWidth, template, args).map_err(|err| {
        sink.take_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, err))
    })
}
