//! Template directive parser.
//!
//! A directive starts at `$` and runs through a chain of one-byte modifiers
//! up to a conversion letter:
//!
//! | byte          | meaning                                               |
//! |---------------|-------------------------------------------------------|
//! | `0`           | zero-fill the numeral body up to the width            |
//! | `1`-`9`...    | minimum width in display columns                      |
//! | `<` `>`       | left / right alignment                                |
//! | `.N` `.*`     | string precision (bytes), literal or from an argument |
//! | `/Ds`         | group numerals by `D` digits with separator `s`       |
//! | `+` / space   | always-sign / space-for-non-negative                  |
//! | `e` / `E`     | C escape strings (`E`: numeric escapes always `\xHH`) |
//! | `y` `o` `n` `x` | radix 2/8/10/16 with `0b`/`0o`/`0d`/`0x` prefix     |
//! | `Y` `O` `N` `X` | same radix, no prefix                               |
//!
//! `x`/`X` also select hex dumping for strings. Conversions: `c` code point,
//! `s` byte string (or bytes with a caller converter, see
//! [`Arg::converted`](super::Arg::converted)), and the integer letters listed
//! on [`IntKind`].

use crate::numeral::{NO_GROUPING, SignMode};

// ---------------------------------------------------------------------------
// Directive types
// ---------------------------------------------------------------------------

/// Byte that introduces a directive. Doubled, it stands for itself.
pub const INTRODUCER: u8 = b'$';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    /// Right for numerals, left for code points and strings.
    #[default]
    Default,
    Left,
    Right,
}

impl Align {
    #[must_use]
    pub const fn or(self, default: Align) -> Align {
        match self {
            Align::Default => default,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Precision {
    #[default]
    None,
    Fixed(usize),
    FromArg,
}

/// How string bytes are transformed on output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Escape {
    #[default]
    None,
    Hex,
    C,
    CForceHex,
}

/// Everything before the conversion letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub zero_fill: bool,
    pub width: usize,
    pub align: Align,
    pub sign: SignMode,
    pub radix: Option<u8>,
    pub prefix: &'static [u8],
    pub group: u8,
    pub separator: u8,
    pub precision: Precision,
    pub escape: Escape,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            zero_fill: false,
            width: 0,
            align: Align::Default,
            sign: SignMode::Negative,
            radix: None,
            prefix: b"",
            group: NO_GROUPING,
            separator: b'_',
            precision: Precision::None,
            escape: Escape::None,
        }
    }
}

/// Integer argument class of a conversion letter.
///
/// | letter | kind  | letter | kind  |
/// |--------|-------|--------|-------|
/// | `b`    | u8    | `B`    | i8    |
/// | `w` `h`| u16   | `W` `H`| i16   |
/// | `d` `i`| u32   | `D` `I`| i32   |
/// | `q` `l`| u64   | `Q` `L`| i64   |
/// | `z`    | usize | `Z`    | isize |
/// | `p`    | usize | `P`    | isize, hex by default |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    Usize,
    Isize,
    UPtr,
    IPtr,
}

impl IntKind {
    #[must_use]
    pub const fn from_letter(letter: u8) -> Option<Self> {
        Some(match letter {
            b'b' => Self::U8,
            b'B' => Self::I8,
            b'w' | b'h' => Self::U16,
            b'W' | b'H' => Self::I16,
            b'd' | b'i' => Self::U32,
            b'D' | b'I' => Self::I32,
            b'q' | b'l' => Self::U64,
            b'Q' | b'L' => Self::I64,
            b'z' => Self::Usize,
            b'Z' => Self::Isize,
            b'p' => Self::UPtr,
            b'P' => Self::IPtr,
            _ => return None,
        })
    }

    #[must_use]
    pub const fn default_radix(self) -> u8 {
        match self {
            Self::IPtr => 16,
            _ => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    CodePoint,
    Int(IntKind),
    Str,
}

/// A parsed directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub modifiers: Modifiers,
    pub conversion: Conversion,
}

/// Parse failure, positioned relative to the slice given to
/// [`parse_directive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveError {
    /// Unknown byte, bad grouping spec, or the template ended mid-directive.
    Malformed(usize),
    /// C escaping requested for a conversion that is not a string.
    Unsupported(usize),
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse one directive from the bytes following the introducer.
///
/// Returns the directive and the number of bytes it spans, conversion
/// letter included.
pub fn parse_directive(fmt: &[u8]) -> Result<(Directive, usize), DirectiveError> {
    let mut m = Modifiers::default();
    let mut pos = 0;

    loop {
        let Some(&byte) = fmt.get(pos) else {
            return Err(DirectiveError::Malformed(pos));
        };
        let at = pos;
        pos += 1;

        let conversion = match byte {
            b'0' => {
                m.zero_fill = true;
                continue;
            }
            b'1'..=b'9' => {
                let (value, used) = parse_decimal(&fmt[at..]);
                m.width = value;
                pos = at + used;
                continue;
            }
            b'.' => {
                if fmt.get(pos) == Some(&b'*') {
                    pos += 1;
                    m.precision = Precision::FromArg;
                } else {
                    let (value, used) = parse_decimal(&fmt[pos..]);
                    pos += used;
                    m.precision = Precision::Fixed(value);
                }
                continue;
            }
            b'<' => {
                m.align = Align::Left;
                continue;
            }
            b'>' => {
                m.align = Align::Right;
                continue;
            }
            b'+' => {
                m.sign = SignMode::Always;
                continue;
            }
            b' ' => {
                m.sign = SignMode::Space;
                continue;
            }
            b'/' => {
                let group = match fmt.get(pos) {
                    Some(&d) if d.is_ascii_digit() => d - b'0',
                    _ => return Err(DirectiveError::Malformed(pos)),
                };
                let separator = match fmt.get(pos + 1) {
                    Some(&s) if (0x20..=0x7E).contains(&s) => s,
                    _ => return Err(DirectiveError::Malformed(pos + 1)),
                };
                m.group = if group == 0 { NO_GROUPING } else { group };
                m.separator = separator;
                pos += 2;
                continue;
            }
            b'e' => {
                m.escape = Escape::C;
                continue;
            }
            b'E' => {
                m.escape = Escape::CForceHex;
                continue;
            }
            b'y' | b'o' | b'n' | b'x' | b'Y' | b'O' | b'N' | b'X' => {
                set_radix(&mut m, byte);
                continue;
            }
            b'c' => Conversion::CodePoint,
            b's' => Conversion::Str,
            other => match IntKind::from_letter(other) {
                Some(kind) => Conversion::Int(kind),
                None => return Err(DirectiveError::Malformed(at)),
            },
        };

        if conversion != Conversion::Str && matches!(m.escape, Escape::C | Escape::CForceHex) {
            return Err(DirectiveError::Unsupported(at));
        }
        return Ok((
            Directive {
                modifiers: m,
                conversion,
            },
            pos,
        ));
    }
}

fn set_radix(m: &mut Modifiers, letter: u8) {
    let (radix, prefix): (u8, &'static [u8]) = match letter.to_ascii_lowercase() {
        b'y' => (2, b"0b"),
        b'o' => (8, b"0o"),
        b'n' => (10, b"0d"),
        _ => (16, b"0x"),
    };
    m.radix = Some(radix);
    if letter.is_ascii_lowercase() {
        m.prefix = prefix;
    }
    if radix == 16 {
        m.escape = Escape::Hex;
    }
}

/// Leading decimal digits, saturating. Returns the value and digit count.
fn parse_decimal(digits: &[u8]) -> (usize, usize) {
    let mut value = 0_usize;
    let mut used = 0;
    for &d in digits.iter().take_while(|d| d.is_ascii_digit()) {
        value = value.saturating_mul(10).saturating_add(usize::from(d - b'0'));
        used += 1;
    }
    (value, used)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
