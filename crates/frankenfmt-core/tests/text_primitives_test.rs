use frankenfmt_core::conv::{ChunkConverter, ConvStatus, HexToBin, convert_whole};
use frankenfmt_core::numeral::{
    MAX_RADIX, MIN_RADIX, NumeralStyle, ParseStatus, SignMode, detect_radix, parse_u64,
    render_i64, render_u64,
};
use frankenfmt_core::string::{c_escape, c_escaped_len, hex_encode};
use frankenfmt_core::unicode::{Utf16Flags, Utf8ErrorKind, utf16le_to_utf8, validate};

fn rendered(value: u64, style: &NumeralStyle) -> Vec<u8> {
    let mut buf = [0u8; 128];
    let n = render_u64(&mut buf, value, style).unwrap();
    buf[..n].to_vec()
}

#[test]
fn render_then_parse_recovers_the_value_in_every_radix() {
    let samples = [0, 1, 35, 36, 255, 1 << 31, 0xDEAD_BEEF, u64::MAX / 3, u64::MAX];
    for radix in MIN_RADIX..=MAX_RADIX {
        for &value in &samples {
            let text = rendered(value, &NumeralStyle::radix(radix));
            let parsed = parse_u64(&text, radix);
            assert_eq!(parsed.status, ParseStatus::Complete, "radix {radix}");
            assert_eq!(parsed.value, value, "radix {radix}");
            assert_eq!(parsed.consumed, text.len());
        }
    }
}

#[test]
fn grouped_hex_with_width() {
    let style = NumeralStyle::radix(16).with_width(8).with_grouping(4, b'_');
    assert_eq!(rendered(0xABCD, &style), b"000_ABCD");
}

#[test]
fn negative_zero_padded_decimal() {
    let mut buf = [0u8; 16];
    let style = NumeralStyle::default().with_width(5);
    let n = render_i64(&mut buf, -52, SignMode::Negative, b"", &style).unwrap();
    assert_eq!(&buf[..n], b"-0052");
}

#[test]
fn auto_radix_parse() {
    let text = b"0x1A";
    let (radix, skip) = detect_radix(text);
    assert_eq!((radix, skip), (16, 2));
    let parsed = parse_u64(text, 0);
    assert_eq!(
        (parsed.value, parsed.consumed, parsed.status),
        (26, 4, ParseStatus::Complete)
    );
}

#[test]
fn utf8_validation_categories() {
    let err = validate(&[0xC0, 0x80]).unwrap_err();
    assert_eq!((err.kind, err.valid_len), (Utf8ErrorKind::Overlong, 0));
    let err = validate(&[0xE2]).unwrap_err();
    assert_eq!((err.kind, err.valid_len), (Utf8ErrorKind::Unterminated, 0));
    let err = validate(b"ok\xED\xA0\x80").unwrap_err();
    assert_eq!((err.kind, err.valid_len), (Utf8ErrorKind::Surrogate, 2));
    assert!(validate("größe ✓ 🦀".as_bytes()).is_ok());
}

#[test]
fn hex_decode_skips_separators() {
    let conv = HexToBin::skipping(b" ");
    let mut out = [0u8; 4];
    let step = conv.feed(&mut (), b"41 42", &mut out);
    assert_eq!(step.consumed, 5);
    assert_eq!(step.produced, 2);
    assert_eq!(step.status, ConvStatus::Complete);
    assert_eq!(&out[..2], &[0x41, 0x42]);
}

#[test]
fn hex_encode_then_decode() {
    let data = b"\x00\x7f\x80\xff frank";
    let mut hex = [0u8; 64];
    let n = hex_encode(&mut hex, data);
    assert_eq!(n, data.len() * 2);

    let mut back = [0u8; 32];
    let step = convert_whole(&HexToBin::skipping(b""), &hex[..n], &mut back);
    assert_eq!(step.status, ConvStatus::Complete);
    assert_eq!(&back[..step.produced], data);
}

#[test]
fn c_escape_fills_exactly_its_reported_length() {
    let data = b"say \"hi\"\x01A\x7f\n\\";
    let need = c_escaped_len(data);
    let mut out = vec![0u8; need];
    assert_eq!(c_escape(&mut out, data), Some(need));
    assert_eq!(out, b"say \\\"hi\\\"\\001A\\x7F\\n\\\\");
    let mut short = vec![0u8; need - 1];
    assert_eq!(c_escape(&mut short, data), None);
}

#[test]
fn mutf8_from_utf16() {
    let data: Vec<u8> = [0x0041u16, 0x0000, 0xD83E, 0xDD80]
        .iter()
        .flat_map(|u| u.to_le_bytes())
        .collect();
    let mut out = [0u8; 16];
    let n = utf16le_to_utf8(&mut out, &data, Utf16Flags::MUTF8).unwrap();
    assert_eq!(
        &out[..n],
        &[0x41, 0xC0, 0x80, 0xED, 0xA0, 0xBE, 0xED, 0xB6, 0x80]
    );
}
