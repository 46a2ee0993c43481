#![no_main]
use frankenfmt_core::conv::{CEscape, ChunkConverter, ConvStatus, EscapeState};
use frankenfmt_core::string::{c_escape, c_escaped_len};
use libfuzzer_sys::fuzz_target;

// Streaming through a tiny output buffer must give the same bytes as one
// whole-buffer escape.
fuzz_target!(|data: &[u8]| {
    let Some((&chunk, input)) = data.split_first() else {
        return;
    };
    let need = c_escaped_len(input);
    let mut whole = vec![0u8; need];
    assert_eq!(c_escape(&mut whole, input), Some(need));

    let mut out = vec![0u8; 4 + usize::from(chunk % 16)];
    let mut state = EscapeState::default();
    let mut streamed = Vec::with_capacity(need);
    let mut rest = input;
    while !rest.is_empty() {
        let step = CEscape.feed(&mut state, rest, &mut out);
        streamed.extend_from_slice(&out[..step.produced]);
        rest = &rest[step.consumed..];
        assert!(step.status == ConvStatus::Complete || step.status == ConvStatus::Full);
        assert!(step.consumed > 0 || step.produced > 0);
    }
    let tail = CEscape.finish(&mut state, &mut out);
    assert_eq!(tail.status, ConvStatus::Complete);
    streamed.extend_from_slice(&out[..tail.produced]);
    assert_eq!(streamed, whole);
});
