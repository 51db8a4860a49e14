#![no_main]
use libfuzzer_sys::fuzz_target;
use z85::{DecodeMode, Padding, decode_with, encode};

fuzz_target!(|data: &[u8]| {
    let text = encode(data, Padding::Auto).unwrap();
    let decoded = decode_with(&text, DecodeMode::Strict).unwrap();
    assert_eq!(decoded, data);

    // Trimmed to a frame boundary, unpadded encoding must agree.
    let aligned = &data[..data.len() / 4 * 4];
    let unpadded = encode(aligned, Padding::Disabled).unwrap();
    assert!(text.starts_with(&unpadded));
});
