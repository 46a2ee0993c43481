#![no_main]
use frankenfmt_core::unicode::{code_points, decode_valid, encode, utf8_term_width, validate};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let ours = validate(data);
    let std = std::str::from_utf8(data);
    assert_eq!(ours.is_ok(), std.is_ok());
    match (ours, std) {
        (Err(err), Err(std_err)) => assert_eq!(err.valid_len, std_err.valid_up_to()),
        (Ok(()), Ok(text)) => {
            let decoded: Vec<u32> = code_points(data).collect();
            let expected: Vec<u32> = text.chars().map(u32::from).collect();
            assert_eq!(decoded, expected);

            let mut rebuilt = Vec::with_capacity(data.len());
            let mut piece = [0u8; 4];
            for cp in decoded {
                let n = encode(&mut piece, cp).expect("scalar values encode");
                rebuilt.extend_from_slice(&piece[..n]);
            }
            assert_eq!(rebuilt, data);

            if let Some((cp, len)) = decode_valid(data) {
                assert_eq!(Some(cp), text.chars().next().map(u32::from));
                assert_eq!(len, text.chars().next().map_or(0, char::len_utf8));
            }
            let _ = utf8_term_width(data);
        }
        _ => unreachable!(),
    }
});
