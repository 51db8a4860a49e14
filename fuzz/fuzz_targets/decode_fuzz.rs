#![no_main]
use libfuzzer_sys::fuzz_target;
use z85::{DecodeMode, decode, decode_with};

fuzz_target!(|data: &[u8]| {
    // The decoder must never panic, only return errors.
    let lenient = decode(data);
    let strict = decode_with(data, DecodeMode::Strict);

    // Anything strict accepts, lenient decodes identically.
    if let Ok(bytes) = strict {
        assert_eq!(lenient.ok(), Some(bytes));
    }
});
