#![no_main]
use frankenfmt_core::{Arg, ByteWidth, SliceSink, TermWidth, format_to};
use libfuzzer_sys::fuzz_target;

// Layout: [template_len, template..., string argument...]. Every integer
// class gets an argument so any directive can find a match.
fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (template, text) = rest.split_at(usize::from(split).min(rest.len()));

    let args = [
        Arg::Str(text),
        Arg::U32(u32::from(split)),
        Arg::I64(-(text.len() as i64)),
        Arg::Char(0x1F980),
        Arg::Usize(text.len() / 2),
        Arg::Str(template),
    ];

    let mut out = Vec::new();
    let full = format_to(&mut out, &mut TermWidth, template, &args);
    match &full {
        Ok(n) => {
            assert_eq!(*n, out.len());
            assert_eq!(out.last(), Some(&0));
        }
        Err(err) => assert_eq!(err.emitted, out.len()),
    }

    // Bounded output must agree with unbounded output on size and prefix.
    let mut buf = [0u8; 64];
    let mut sink = SliceSink::new(&mut buf);
    let bounded = format_to(&mut sink, &mut TermWidth, template, &args);
    assert_eq!(bounded.is_ok(), full.is_ok());
    assert_eq!(sink.size(), out.len());
    assert_eq!(sink.as_bytes(), &out[..sink.stored()]);

    let mut again = Vec::new();
    let _ = format_to(&mut again, &mut ByteWidth, template, &args);
});
