#![no_main]
use libfuzzer_sys::fuzz_target;
use rhprof::RecordHandler;

struct Discard;
impl RecordHandler for Discard {}

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic or loop; errors are fine.
    let mut handler = Discard;
    let _ = rhprof::parse_bytes(data, &mut handler);
});
