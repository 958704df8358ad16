#![no_main]
use libfuzzer_sys::fuzz_target;
use rhprof::bytestream::ByteReader;
use rhprof::IdSize;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let _ = reader.read_null_terminated();
    if let Ok(raw) = reader.read_u32() {
        let _ = IdSize::from_raw(raw);
    }
    let _ = reader.read_u64();
});
