#![no_main]
use frankenfmt_core::numeral::{NumeralStyle, ParseStatus, SignMode, parse_u64, render_i64, render_u64};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 11 {
        let _ = parse_u64(data, 0);
        return;
    }
    let value = u64::from_le_bytes(data[..8].try_into().unwrap_or_default());
    let radix = 2 + data[8] % 35;
    let width = usize::from(data[9] % 80);
    let group = data[10] % 70;

    let mut buf = [0u8; 256];
    let plain = NumeralStyle::radix(radix);
    let n = render_u64(&mut buf, value, &plain).expect("plain numeral fits");
    let parsed = parse_u64(&buf[..n], radix);
    assert_eq!(parsed.status, ParseStatus::Complete);
    assert_eq!(parsed.value, value);
    assert_eq!(parsed.consumed, n);

    let styled = plain.with_width(width).with_grouping(group, b'_');
    if let Ok(n) = render_u64(&mut buf, value, &styled) {
        assert!(n >= width.max(1));
        assert!(buf[..n].first() != Some(&b'_'));
    }
    let _ = render_i64(&mut buf, value as i64, SignMode::Always, b"0x", &styled);
    let _ = parse_u64(&data[11..], 0);
});
