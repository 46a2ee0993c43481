//! Template interpreter.
//!
//! Literal runs go straight to the sink. Each directive is rendered into the
//! call's scratch region (numerals, code points) or streamed from the
//! argument through a converter (escaped strings and caller converters),
//! padded with spaces to the requested display width, and written out. The first failure stops the
//! call; whatever already reached the sink stays there and is reported in
//! [`FormatError::emitted`].

use thiserror::Error;

use super::arg::{Arg, Converted, StreamConverter};
use super::printf::{
    Align, Conversion, Directive, DirectiveError, Escape, INTRODUCER, IntKind, Modifiers,
    Precision, parse_directive,
};
use super::scratch::{SCRATCH_CAPACITY, Scratch};
use super::sink::{ByteSink, SinkError};
use crate::conv::{BinToHex, CEscape, CEscapeForceHex, ChunkConverter, ConvStatus};
use crate::numeral::{NumeralStyle, render_sign_magnitude};
use crate::string::nul_terminated;
use crate::unicode::{WidthError, WidthMeasure};

/// What went wrong with an argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArgProblem {
    #[error("missing")]
    Missing,
    #[error("type does not match the conversion")]
    Mismatch,
    #[error("not a Unicode scalar value")]
    InvalidCodePoint,
}

/// Cause of a failed formatting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatErrorKind {
    #[error("malformed directive at template offset {offset}")]
    Malformed { offset: usize },
    #[error("width measurement failed")]
    Width(#[source] WidthError),
    #[error("sink accepted {accepted} of {requested} bytes")]
    Write {
        accepted: usize,
        requested: usize,
        source: Option<SinkError>,
    },
    #[error("converter stopped with status {0:?}")]
    Conversion(ConvStatus),
    #[error("escape mode not supported for the conversion at template offset {offset}")]
    Unsupported { offset: usize },
    /// A buffered directive (a zero-filled numeral) does not fit the scratch
    /// region.
    #[error("directive at template offset {offset} does not fit the scratch region")]
    Capacity { offset: usize },
    #[error("argument {index}: {problem}")]
    Argument { index: usize, problem: ArgProblem },
}

/// A failed formatting call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} after {emitted} bytes were written")]
pub struct FormatError {
    #[source]
    pub kind: FormatErrorKind,
    /// Bytes the sink accepted before the failure.
    pub emitted: usize,
}

impl DirectiveError {
    fn at(self, base: usize) -> FormatErrorKind {
        match self {
            DirectiveError::Malformed(rel) => FormatErrorKind::Malformed { offset: base + rel },
            DirectiveError::Unsupported(rel) => FormatErrorKind::Unsupported { offset: base + rel },
        }
    }
}

/// Interpret `template` against `args`, writing to `sink`.
///
/// Display widths come from `width`. A NUL byte is written after the last
/// template byte. Returns the number of bytes written, NUL included.
/// Arguments past the last directive are ignored.
pub fn format_to<S, W>(
    sink: &mut S,
    width: &mut W,
    template: &[u8],
    args: &[Arg<'_>],
) -> Result<usize, FormatError>
where
    S: ByteSink + ?Sized,
    W: WidthMeasure + ?Sized,
{
    let mut engine = Engine {
        out: Output { sink, emitted: 0 },
        width,
        scratch: Scratch::new(),
        args: ArgCursor { args, next: 0 },
    };
    match engine.run(template) {
        Ok(()) => Ok(engine.out.emitted),
        Err(kind) => Err(FormatError {
            kind,
            emitted: engine.out.emitted,
        }),
    }
}

// ---------------------------------------------------------------------------
// Output side
// ---------------------------------------------------------------------------

const SPACES: [u8; 64] = [b' '; 64];

struct Output<'s, S: ?Sized> {
    sink: &'s mut S,
    emitted: usize,
}

impl<S: ByteSink + ?Sized> Output<'_, S> {
    fn write(&mut self, chunk: &[u8]) -> Result<(), FormatErrorKind> {
        if chunk.is_empty() {
            return Ok(());
        }
        let requested = chunk.len();
        match self.sink.write(chunk) {
            Ok(accepted) if accepted >= requested => {
                self.emitted += requested;
                Ok(())
            }
            Ok(accepted) => {
                self.emitted += accepted;
                Err(FormatErrorKind::Write {
                    accepted,
                    requested,
                    source: None,
                })
            }
            Err(err) => Err(FormatErrorKind::Write {
                accepted: 0,
                requested,
                source: Some(err),
            }),
        }
    }

    fn pad(&mut self, mut count: usize) -> Result<(), FormatErrorKind> {
        while count > 0 {
            let run = count.min(SPACES.len());
            self.write(&SPACES[..run])?;
            count -= run;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

struct ArgCursor<'b, 'a> {
    args: &'b [Arg<'a>],
    next: usize,
}

impl<'a> ArgCursor<'_, 'a> {
    fn take<T>(&mut self, pick: impl FnOnce(Arg<'a>) -> Result<T, ArgProblem>) -> Result<T, FormatErrorKind> {
        let index = self.next;
        let problem = match self.args.get(index) {
            Some(&arg) => match pick(arg) {
                Ok(value) => {
                    self.next += 1;
                    return Ok(value);
                }
                Err(problem) => problem,
            },
            None => ArgProblem::Missing,
        };
        Err(FormatErrorKind::Argument { index, problem })
    }

    fn precision(&mut self) -> Result<usize, FormatErrorKind> {
        self.take(|arg| match arg {
            Arg::Usize(n) => Ok(n),
            _ => Err(ArgProblem::Mismatch),
        })
    }

    fn code_point(&mut self) -> Result<char, FormatErrorKind> {
        self.take(|arg| match arg {
            Arg::Char(cp) => char::from_u32(cp).ok_or(ArgProblem::InvalidCodePoint),
            _ => Err(ArgProblem::Mismatch),
        })
    }

    /// A byte string. Caller converters only fit a directive without an
    /// escape mode.
    fn text(&mut self, escape: Escape) -> Result<Text<'a>, FormatErrorKind> {
        self.take(|arg| match arg {
            Arg::Str(s) => Ok(Text::Plain(s)),
            Arg::Converted(c) if escape == Escape::None => Ok(Text::Converted(c)),
            _ => Err(ArgProblem::Mismatch),
        })
    }

    /// Sign and magnitude of an integer argument of the given class.
    fn integer(&mut self, kind: IntKind) -> Result<(bool, u64), FormatErrorKind> {
        fn signed(v: i64) -> (bool, u64) {
            (v < 0, v.unsigned_abs())
        }
        self.take(|arg| {
            Ok(match (kind, arg) {
                (IntKind::U8, Arg::U8(v)) => (false, u64::from(v)),
                (IntKind::I8, Arg::I8(v)) => signed(i64::from(v)),
                (IntKind::U16, Arg::U16(v)) => (false, u64::from(v)),
                (IntKind::I16, Arg::I16(v)) => signed(i64::from(v)),
                (IntKind::U32, Arg::U32(v)) => (false, u64::from(v)),
                (IntKind::I32, Arg::I32(v)) => signed(i64::from(v)),
                (IntKind::U64, Arg::U64(v)) => (false, v),
                (IntKind::I64, Arg::I64(v)) => signed(v),
                (IntKind::Usize | IntKind::UPtr, Arg::Usize(v)) => (false, v as u64),
                (IntKind::Isize | IntKind::IPtr, Arg::Isize(v)) => signed(v as i64),
                _ => return Err(ArgProblem::Mismatch),
            })
        })
    }
}

enum Text<'a> {
    Plain(&'a [u8]),
    Converted(Converted<'a>),
}

/// String bytes considered by a directive: up to `precision`, else up to the
/// first NUL.
fn clip(data: &[u8], precision: Option<usize>) -> &[u8] {
    match precision {
        Some(limit) => &data[..limit.min(data.len())],
        None => nul_terminated(data),
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

struct Engine<'s, 'w, 'b, 'a, S: ?Sized, W: ?Sized> {
    out: Output<'s, S>,
    width: &'w mut W,
    scratch: Scratch<SCRATCH_CAPACITY>,
    args: ArgCursor<'b, 'a>,
}

impl<S, W> Engine<'_, '_, '_, '_, S, W>
where
    S: ByteSink + ?Sized,
    W: WidthMeasure + ?Sized,
{
    fn run(&mut self, template: &[u8]) -> Result<(), FormatErrorKind> {
        let mut pos = 0;
        while pos < template.len() {
            let rest = &template[pos..];
            let literal = rest
                .iter()
                .position(|&b| b == INTRODUCER)
                .unwrap_or(rest.len());
            self.out.write(&rest[..literal])?;
            pos += literal;
            if pos == template.len() {
                break;
            }

            let start = pos;
            pos += 1;
            if template.get(pos) == Some(&INTRODUCER) {
                self.out.write(&[INTRODUCER])?;
                pos += 1;
                continue;
            }
            let (directive, used) =
                parse_directive(&template[pos..]).map_err(|e| e.at(pos))?;
            pos += used;
            self.directive(&directive, start)?;
        }
        self.out.write(&[0])
    }

    /// Display width of buffered or verbatim text. Always measured, so text
    /// the width function rejects fails even without padding.
    fn measure(&mut self, text: &[u8]) -> Result<usize, FormatErrorKind> {
        self.width
            .measure(text)
            .map(|cols| cols as usize)
            .map_err(FormatErrorKind::Width)
    }

    fn directive(&mut self, d: &Directive, offset: usize) -> Result<(), FormatErrorKind> {
        let m = &d.modifiers;
        let precision = match m.precision {
            Precision::None => None,
            Precision::Fixed(n) => Some(n),
            Precision::FromArg => Some(self.args.precision()?),
        };

        match d.conversion {
            Conversion::CodePoint => {
                let ch = self.args.code_point()?;
                let mut utf8 = [0u8; 4];
                self.scratch.clear();
                self.scratch
                    .push(ch.encode_utf8(&mut utf8).as_bytes())
                    .map_err(|_| FormatErrorKind::Capacity { offset })?;
                let cols = self.measure(&utf8[..ch.len_utf8()])?;
                self.padded(cols, m, Align::Left, |e| e.out.write(e.scratch.as_bytes()))
            }
            Conversion::Int(kind) => {
                let (negative, magnitude) = self.args.integer(kind)?;
                let style = NumeralStyle {
                    radix: m.radix.unwrap_or(kind.default_radix()),
                    min_width: if m.zero_fill { m.width } else { 1 },
                    group: m.group,
                    separator: m.separator,
                };
                let rendered = self
                    .scratch
                    .fill(|buf| render_sign_magnitude(buf, negative, magnitude, m.sign, m.prefix, &style))
                    .map_err(|_| FormatErrorKind::Capacity { offset })?;
                let cols = rendered.len();
                self.padded(cols, m, Align::Right, |e| e.out.write(e.scratch.as_bytes()))
            }
            Conversion::Str => match self.args.text(m.escape)? {
                Text::Converted(c) => self.escaped(c.conv, clip(c.data, precision), m),
                Text::Plain(data) => {
                    let data = clip(data, precision);
                    match m.escape {
                        Escape::None => {
                            let cols = self.measure(data)?;
                            self.padded(cols, m, Align::Left, |e| e.out.write(data))
                        }
                        Escape::Hex => self.escaped(&BinToHex, data, m),
                        Escape::C => self.escaped(&CEscape, data, m),
                        Escape::CForceHex => self.escaped(&CEscapeForceHex, data, m),
                    }
                }
            },
        }
    }

    /// Emit `body` with space padding up to the requested width.
    fn padded(
        &mut self,
        cols: usize,
        m: &Modifiers,
        default_align: Align,
        body: impl FnOnce(&mut Self) -> Result<(), FormatErrorKind>,
    ) -> Result<(), FormatErrorKind> {
        let fill = m.width.saturating_sub(cols);
        let align = m.align.or(default_align);
        if align == Align::Right {
            self.out.pad(fill)?;
        }
        body(self)?;
        if align == Align::Left {
            self.out.pad(fill)?;
        }
        Ok(())
    }

    fn escaped(
        &mut self,
        conv: &dyn StreamConverter,
        data: &[u8],
        m: &Modifiers,
    ) -> Result<(), FormatErrorKind> {
        let cols = if m.width > 0 {
            self.estimate_width(conv, data)?
        } else {
            0
        };
        self.padded(cols, m, Align::Left, |e| e.emit(conv, data))
    }

    /// Display width of the converted form, without touching the sink.
    fn estimate_width(&mut self, conv: &dyn StreamConverter, data: &[u8]) -> Result<usize, FormatErrorKind> {
        let width = &mut *self.width;
        let mut total: u32 = 0;
        conv.stream(data, self.scratch.space(), &mut |chunk: &[u8]| -> Result<(), FormatErrorKind> {
            let cols = width.measure(chunk).map_err(FormatErrorKind::Width)?;
            total = total
                .checked_add(cols)
                .filter(|&t| t <= i32::MAX as u32)
                .ok_or(FormatErrorKind::Width(WidthError::Overflow))?;
            Ok(())
        })?;
        Ok(total as usize)
    }

    fn emit(&mut self, conv: &dyn StreamConverter, data: &[u8]) -> Result<(), FormatErrorKind> {
        let out = &mut self.out;
        conv.stream(data, self.scratch.space(), &mut |chunk: &[u8]| out.write(chunk))
    }
}

/// Run `conv` over `data` in scratch-sized pieces from a fresh state,
/// handing every non-empty output chunk to `chunk`, then finish. Output of a
/// failing step is dropped.
pub(crate) fn drive<C: ChunkConverter + ?Sized>(
    conv: &C,
    data: &[u8],
    scratch: &mut [u8],
    mut chunk: impl FnMut(&[u8]) -> Result<(), FormatErrorKind>,
) -> Result<(), FormatErrorKind> {
    let mut state = C::State::default();
    let mut rest = data;
    while !rest.is_empty() {
        let step = conv.feed(&mut state, rest, scratch);
        if !step.can_continue() || (step.consumed == 0 && step.produced == 0) {
            return Err(FormatErrorKind::Conversion(step.status));
        }
        if step.produced > 0 {
            chunk(&scratch[..step.produced])?;
        }
        rest = &rest[step.consumed..];
    }
    let tail = conv.finish(&mut state, scratch);
    if tail.status != ConvStatus::Complete {
        return Err(FormatErrorKind::Conversion(tail.status));
    }
    if tail.produced > 0 {
        chunk(&scratch[..tail.produced])?;
    }
    Ok(())
}
