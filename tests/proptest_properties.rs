use proptest::prelude::*;
use z85::{DecodeMode, Padding, decode, decode_with, decoded_len, encode, encode_padded};

fn aligned_bytes(max_frames: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<[u8; 4]>(), 0..max_frames)
        .prop_map(|frames| frames.concat())
}

proptest! {
    #[test]
    fn prop_aligned_roundtrip(data in aligned_bytes(1024)) {
        let text = encode(&data, Padding::Disabled).unwrap();
        prop_assert_eq!(text.len(), data.len() / 4 * 5);
        prop_assert_eq!(decode(&text).unwrap(), data);
    }

    #[test]
    fn prop_padded_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
        let text = encode(&data, Padding::Auto).unwrap();
        let decoded = decode_with(&text, DecodeMode::Strict).unwrap();
        prop_assert_eq!(decoded, data);
    }

    #[test]
    fn prop_output_is_alphabet_plus_marker(data in proptest::collection::vec(any::<u8>(), 1..512)) {
        let text = encode_padded(&data);
        let bytes = text.as_bytes();
        let body = if data.len() % 4 == 0 { bytes } else { &bytes[..bytes.len() - 1] };
        prop_assert!(body.iter().all(|&c| z85::alphabet::is_z85_char(c)));
        if data.len() % 4 != 0 {
            let marker = bytes[bytes.len() - 1];
            prop_assert_eq!(usize::from(marker - b'0'), 4 - data.len() % 4);
        }
    }

    #[test]
    fn prop_unaligned_unpadded_fails(data in proptest::collection::vec(any::<u8>(), 1..512)) {
        prop_assume!(data.len() % 4 != 0);
        prop_assert!(encode(&data, Padding::Disabled).is_err());
    }

    #[test]
    fn prop_decode_never_panics(text in proptest::collection::vec(any::<u8>(), 0..256)) {
        let lenient = decode(&text);
        let strict = decode_with(&text, DecodeMode::Strict);
        if let Ok(bytes) = &strict {
            prop_assert_eq!(lenient.as_ref().ok(), Some(bytes));
        }
        if let Ok(bytes) = &lenient {
            let max = decoded_len(text.len()).unwrap();
            prop_assert!(max - bytes.len() <= 3);
        }
    }

    #[test]
    fn prop_encoding_preserves_frame_order(a in any::<[u8; 4]>(), b in any::<[u8; 4]>()) {
        let ab = encode(&[a, b].concat(), Padding::Disabled).unwrap();
        let a_text = encode(&a, Padding::Disabled).unwrap();
        let b_text = encode(&b, Padding::Disabled).unwrap();
        prop_assert_eq!(ab, a_text + &b_text);
    }
}
