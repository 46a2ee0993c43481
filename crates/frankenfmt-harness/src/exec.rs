//! Fixture execution: dispatch a case's operation to frankenfmt-core and
//! render the result as comparable text.
//!
//! Byte outputs are shown as text when they are valid UTF-8 and C-escaped
//! otherwise. Failures render as `error:<what>` so fixtures can pin them.

use frankenfmt_core::conv::{ChunkConverter, ConvStatus, HexToBin};
use frankenfmt_core::numeral::{NumeralStyle, ParseStatus, SignMode, parse_u64, render_i64, render_u64};
use frankenfmt_core::string::{c_escape, c_escaped_len, hex_encode};
use frankenfmt_core::unicode::{Utf16Error, Utf16Flags, utf16le_to_utf8, utf16le_to_utf8_len, utf8_term_width, validate};
use frankenfmt_core::{ArgProblem, FormatError, FormatErrorKind, SliceSink, Utf8ErrorKind, format_to};
use serde_json::Value;

use crate::config::WidthPolicy;
use crate::error::HarnessError;
use crate::fixtures::{FixtureArg, FixtureCase};

/// Run one case under `width`, returning its textual output.
///
/// `Err` means the case itself is unusable (unknown operation, missing
/// input); failures of the operation under test are part of the output.
pub fn execute_case(case: &FixtureCase, width: WidthPolicy) -> Result<String, HarnessError> {
    let inputs = &case.inputs;
    match case.operation.as_str() {
        "format" => exec_format(inputs, width),
        "render_u64" => exec_render_u64(inputs),
        "render_i64" => exec_render_i64(inputs),
        "parse_u64" => exec_parse_u64(inputs),
        "validate_utf8" => Ok(match validate(&bytes_input(inputs)?) {
            Ok(()) => String::from("ok"),
            Err(err) => format!("{}@{}", utf8_kind_name(err.kind), err.valid_len),
        }),
        "term_width" => Ok(match utf8_term_width(&bytes_input(inputs)?) {
            Ok(cols) => cols.to_string(),
            Err(err) => format!("error:{err}"),
        }),
        "c_escape" => {
            let data = bytes_input(inputs)?;
            let mut out = vec![0u8; c_escaped_len(&data)];
            Ok(match c_escape(&mut out, &data) {
                Some(n) => display_bytes(&out[..n]),
                None => String::from("error:short"),
            })
        }
        "hex_encode" => {
            let data = bytes_input(inputs)?;
            let mut out = vec![0u8; data.len() * 2];
            let n = hex_encode(&mut out, &data);
            Ok(display_bytes(&out[..n]))
        }
        "hex_to_bin" => exec_hex_to_bin(inputs),
        "utf16_to_utf8" => exec_utf16(inputs),
        other => Err(HarnessError::UnknownOperation(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn exec_format(inputs: &Value, width: WidthPolicy) -> Result<String, HarnessError> {
    let template = str_field(inputs, "template")?;
    let fixture_args: Vec<FixtureArg> = match inputs.get("args") {
        Some(args) => serde_json::from_value(args.clone())?,
        None => Vec::new(),
    };
    let args: Vec<_> = fixture_args.iter().map(FixtureArg::as_arg).collect();
    let mut width = width;

    if let Some(capacity) = opt_u64(inputs, "capacity")? {
        let capacity = usize::try_from(capacity).map_err(|_| HarnessError::input("capacity", "too large"))?;
        let mut buf = vec![0u8; capacity];
        let mut sink = SliceSink::new(&mut buf);
        let result = format_to(&mut sink, &mut width, template.as_bytes(), &args);
        return Ok(match result {
            Ok(_) => format!("{}|size={}", display_bytes(sink.as_bytes()), sink.size()),
            Err(err) => format_error_text(&err),
        });
    }

    let mut out = Vec::new();
    Ok(match format_to(&mut out, &mut width, template.as_bytes(), &args) {
        Ok(_) => display_bytes(out.strip_suffix(b"\0").unwrap_or(&out)),
        Err(err) => format_error_text(&err),
    })
}

fn numeral_style(inputs: &Value) -> Result<NumeralStyle, HarnessError> {
    let radix = opt_u64(inputs, "radix")?.unwrap_or(10);
    let min_width = opt_u64(inputs, "width")?.unwrap_or(1);
    let group = opt_u64(inputs, "group")?.unwrap_or(0);
    let separator = match inputs.get("separator").and_then(Value::as_str) {
        Some(s) if s.len() == 1 => s.as_bytes()[0],
        Some(_) => return Err(HarnessError::input("separator", "expected one ASCII character")),
        None => b'_',
    };
    Ok(NumeralStyle::radix(small(radix, "radix")?)
        .with_width(usize::try_from(min_width).map_err(|_| HarnessError::input("width", "too large"))?)
        .with_grouping(small(group, "group")?, separator))
}

fn exec_render_u64(inputs: &Value) -> Result<String, HarnessError> {
    let value = inputs
        .get("value")
        .and_then(Value::as_u64)
        .ok_or_else(|| HarnessError::input("value", "expected unsigned integer"))?;
    let style = numeral_style(inputs)?;
    let mut buf = vec![0u8; render_capacity(inputs)?];
    Ok(match render_u64(&mut buf, value, &style) {
        Ok(n) => display_bytes(&buf[..n]),
        Err(err) => format!("error:{err}"),
    })
}

fn exec_render_i64(inputs: &Value) -> Result<String, HarnessError> {
    let value = inputs
        .get("value")
        .and_then(Value::as_i64)
        .ok_or_else(|| HarnessError::input("value", "expected signed integer"))?;
    let sign = match inputs.get("sign").and_then(Value::as_str).unwrap_or("negative") {
        "never" => SignMode::Never,
        "negative" => SignMode::Negative,
        "always" => SignMode::Always,
        "space" => SignMode::Space,
        other => return Err(HarnessError::input("sign", format!("unknown sign mode '{other}'"))),
    };
    let prefix = inputs.get("prefix").and_then(Value::as_str).unwrap_or("");
    let style = numeral_style(inputs)?;
    let mut buf = vec![0u8; render_capacity(inputs)?];
    Ok(match render_i64(&mut buf, value, sign, prefix.as_bytes(), &style) {
        Ok(n) => display_bytes(&buf[..n]),
        Err(err) => format!("error:{err}"),
    })
}

fn exec_parse_u64(inputs: &Value) -> Result<String, HarnessError> {
    let text = bytes_input(inputs)?;
    let radix = small(opt_u64(inputs, "radix")?.unwrap_or(0), "radix")?;
    let parsed = parse_u64(&text, radix);
    let status = match parsed.status {
        ParseStatus::Complete => "complete",
        ParseStatus::Stop => "stop",
        ParseStatus::Overflow => "overflow",
        ParseStatus::InvalidRadix => "invalid_radix",
    };
    Ok(format!(
        "value={} consumed={} status={status}",
        parsed.value, parsed.consumed
    ))
}

fn exec_hex_to_bin(inputs: &Value) -> Result<String, HarnessError> {
    let text = bytes_input(inputs)?;
    let skip = inputs.get("skip").and_then(Value::as_str).unwrap_or("");
    let mut out = vec![0u8; text.len() / 2 + 1];
    if let Some(capacity) = opt_u64(inputs, "capacity")? {
        out.truncate(usize::try_from(capacity).unwrap_or(usize::MAX));
    }
    let step = HexToBin::skipping(skip.as_bytes()).feed(&mut (), &text, &mut out);
    let mut hex = vec![0u8; step.produced * 2];
    let n = hex_encode(&mut hex, &out[..step.produced]);
    Ok(format!(
        "consumed={} status={} data={}",
        step.consumed,
        conv_status_name(step.status),
        display_bytes(&hex[..n])
    ))
}

fn exec_utf16(inputs: &Value) -> Result<String, HarnessError> {
    let units: Vec<u16> = match inputs.get("units") {
        Some(units) => serde_json::from_value(units.clone())?,
        None => return Err(HarnessError::input("units", "required field missing")),
    };
    let mut data: Vec<u8> = units.iter().flat_map(|u| u.to_le_bytes()).collect();
    if inputs.get("odd").and_then(Value::as_bool) == Some(true) {
        data.push(0);
    }

    let mut flags = Utf16Flags::NONE;
    if let Some(names) = inputs.get("flags").and_then(Value::as_array) {
        for name in names {
            flags = flags
                | match name.as_str() {
                    Some("two_byte_nul") => Utf16Flags::TWO_BYTE_NUL,
                    Some("allow_unpaired") => Utf16Flags::ALLOW_UNPAIRED_SURROGATES,
                    Some("never_pair") => Utf16Flags::NEVER_PAIR_SURROGATES,
                    Some("mutf8") => Utf16Flags::MUTF8,
                    _ => return Err(HarnessError::input("flags", format!("unknown flag {name}"))),
                };
        }
    }

    let len = match utf16le_to_utf8_len(&data, flags) {
        Ok(len) => len,
        Err(err) => return Ok(utf16_error_text(err)),
    };
    let mut out = vec![0u8; len];
    Ok(match utf16le_to_utf8(&mut out, &data, flags) {
        Ok(n) => {
            let mut hex = vec![0u8; n * 2];
            let h = hex_encode(&mut hex, &out[..n]);
            format!("len={len} data={}", display_bytes(&hex[..h]))
        }
        Err(err) => utf16_error_text(err),
    })
}

// ---------------------------------------------------------------------------
// Result text
// ---------------------------------------------------------------------------

/// Bytes as text: verbatim when valid UTF-8, C-escaped otherwise.
#[must_use]
pub fn display_bytes(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    let mut out = vec![0u8; c_escaped_len(bytes)];
    match c_escape(&mut out, bytes) {
        Some(n) => String::from_utf8_lossy(&out[..n]).into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Stable short form of a formatting failure.
#[must_use]
pub fn format_error_text(err: &FormatError) -> String {
    let what = match err.kind {
        FormatErrorKind::Malformed { offset } => format!("malformed@{offset}"),
        FormatErrorKind::Unsupported { offset } => format!("unsupported@{offset}"),
        FormatErrorKind::Capacity { offset } => format!("capacity@{offset}"),
        FormatErrorKind::Width(_) => String::from("width"),
        FormatErrorKind::Write { accepted, requested, .. } => format!("write {accepted}/{requested}"),
        FormatErrorKind::Conversion(status) => format!("conversion {}", conv_status_name(status)),
        FormatErrorKind::Argument { index, problem } => {
            let problem = match problem {
                ArgProblem::Missing => "missing",
                ArgProblem::Mismatch => "mismatch",
                ArgProblem::InvalidCodePoint => "invalid_code_point",
            };
            format!("arg{index} {problem}")
        }
    };
    format!("error:{what} emitted={}", err.emitted)
}

fn utf8_kind_name(kind: Utf8ErrorKind) -> &'static str {
    match kind {
        Utf8ErrorKind::Unterminated => "unterminated",
        Utf8ErrorKind::MalformedStart => "malformed_start",
        Utf8ErrorKind::MalformedContinuation => "malformed_continuation",
        Utf8ErrorKind::Surrogate => "surrogate",
        Utf8ErrorKind::Overlong => "overlong",
        Utf8ErrorKind::OutOfRange => "out_of_range",
    }
}

fn conv_status_name(status: ConvStatus) -> &'static str {
    match status {
        ConvStatus::Complete => "complete",
        ConvStatus::Malformed => "malformed",
        ConvStatus::Incomplete => "incomplete",
        ConvStatus::Full => "full",
    }
}

fn utf16_error_text(err: Utf16Error) -> String {
    match err {
        Utf16Error::OddLength => String::from("error:odd_length"),
        Utf16Error::UnpairedSurrogate { offset } => format!("error:unpaired@{offset}"),
        Utf16Error::Overflow => String::from("error:overflow"),
        Utf16Error::BufferTooSmall { needed, .. } => format!("error:short needed={needed}"),
    }
}

// ---------------------------------------------------------------------------
// Input accessors
// ---------------------------------------------------------------------------

fn str_field<'v>(inputs: &'v Value, field: &str) -> Result<&'v str, HarnessError> {
    inputs
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| HarnessError::input(field, "expected string"))
}

fn opt_u64(inputs: &Value, field: &str) -> Result<Option<u64>, HarnessError> {
    match inputs.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| HarnessError::input(field, "expected unsigned integer")),
    }
}

fn small(value: u64, field: &str) -> Result<u8, HarnessError> {
    u8::try_from(value).map_err(|_| HarnessError::input(field, "out of range"))
}

fn render_capacity(inputs: &Value) -> Result<usize, HarnessError> {
    let capacity = opt_u64(inputs, "capacity")?.unwrap_or(256);
    usize::try_from(capacity).map_err(|_| HarnessError::input("capacity", "too large"))
}

/// Input bytes from `bytes` (array of integers) or `text` (UTF-8 string).
fn bytes_input(inputs: &Value) -> Result<Vec<u8>, HarnessError> {
    if let Some(bytes) = inputs.get("bytes") {
        return Ok(serde_json::from_value(bytes.clone())?);
    }
    if let Some(text) = inputs.get("text").and_then(Value::as_str) {
        return Ok(text.as_bytes().to_vec());
    }
    Err(HarnessError::input("bytes", "expected `bytes` array or `text` string"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn case(operation: &str, inputs: Value) -> FixtureCase {
        FixtureCase {
            name: String::from("t"),
            operation: operation.to_string(),
            section: String::new(),
            inputs,
            expected_output: String::new(),
            width: String::from("both"),
        }
    }

    fn run(operation: &str, inputs: Value) -> String {
        execute_case(&case(operation, inputs), WidthPolicy::Term).unwrap()
    }

    #[test]
    fn test_format_reference_line() {
        let out = run(
            "format",
            json!({
                "template": "It happens$4c Rama ding ding! b=$05B s=$>5.3s\n",
                "args": [{"char": "!"}, {"i8": -7}, {"str": "abcdef"}]
            }),
        );
        assert_eq!(out, "It happens!    Rama ding ding! b=-0007 s=  abc\n");
    }

    #[test]
    fn format_width_policy_changes_padding() {
        let inputs = json!({"template": "[$4s]", "args": [{"str": "漢"}]});
        assert_eq!(run("format", inputs.clone()), "[漢  ]");
        let bytes = execute_case(&case("format", inputs), WidthPolicy::Bytes).unwrap();
        assert_eq!(bytes, "[漢 ]");
    }

    #[test]
    fn format_errors_render_with_emitted_count() {
        let out = run("format", json!({"template": "ab$q", "args": [{"u32": 1}]}));
        assert_eq!(out, "error:arg0 mismatch emitted=2");
    }

    #[test]
    fn format_into_bounded_buffer_reports_size() {
        let out = run("format", json!({"template": "hello", "capacity": 3}));
        assert_eq!(out, "hel|size=6");
    }

    #[test]
    fn test_numeral_operations() {
        assert_eq!(
            run("render_u64", json!({"value": 0xABCD, "radix": 16, "width": 8, "group": 4})),
            "000_ABCD"
        );
        assert_eq!(run("render_i64", json!({"value": -52, "width": 5})), "-0052");
        assert_eq!(
            run("render_u64", json!({"value": 1, "radix": 1})),
            "error:radix 1 is outside 2..=36"
        );
        assert_eq!(
            run("parse_u64", json!({"text": "0x1A"})),
            "value=26 consumed=4 status=complete"
        );
    }

    #[test]
    fn test_text_operations() {
        assert_eq!(run("validate_utf8", json!({"bytes": [192, 128]})), "overlong@0");
        assert_eq!(run("validate_utf8", json!({"text": "ok"})), "ok");
        assert_eq!(run("term_width", json!({"text": "a漢"})), "3");
        assert_eq!(run("c_escape", json!({"bytes": [1, 65, 10]})), "\\001A\\n");
        assert_eq!(run("hex_encode", json!({"text": "AB"})), "4142");
        assert_eq!(
            run("hex_to_bin", json!({"text": "41 42", "skip": " "})),
            "consumed=5 status=complete data=4142"
        );
        assert_eq!(
            run("utf16_to_utf8", json!({"units": [0x41, 0], "flags": ["two_byte_nul"]})),
            "len=3 data=41C080"
        );
        assert_eq!(
            run("utf16_to_utf8", json!({"units": [0xDC00, 0xD800]})),
            "error:unpaired@0"
        );
    }

    #[test]
    fn display_escapes_invalid_utf8() {
        assert_eq!(display_bytes(b"ok"), "ok");
        assert_eq!(display_bytes(b"\xff"), "\\xFF");
    }

    #[test]
    fn unknown_operation_is_a_case_error() {
        let err = execute_case(&case("frobnicate", json!({})), WidthPolicy::Term).unwrap_err();
        assert!(matches!(err, HarnessError::UnknownOperation(op) if op == "frobnicate"));
    }
}
