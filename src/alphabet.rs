// Z85 alphabet and reverse lookup (ZeroMQ spec:32/Z85).
//
// Digit values 0..=84 map to `0-9`, `a-z`, `A-Z`, then 23 punctuation
// symbols. The reverse table is indexed by `(byte - 32) & 0x7F` and is built
// at compile time from the forward alphabet.

/// Number of symbols in the alphabet (the radix).
pub const RADIX: u32 = 85;

/// Forward table: digit value -> ASCII symbol.
pub const ALPHABET: &[u8; 85] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-:+=^!/*?&<>()[]{}@%$#";

/// Sentinel stored in the reverse table for bytes outside the alphabet.
pub const INVALID: u8 = 0xFF;

/// Reverse table: `(byte - 32) & 0x7F` -> digit value, or `INVALID`.
///
/// Slots 0..96 cover printable ASCII (space through DEL); slots 96..128 are
/// reached by control characters after the wrapping subtraction and always
/// hold the sentinel.
pub const REVERSE: [u8; 128] = build_reverse();

const fn build_reverse() -> [u8; 128] {
    let mut table = [INVALID; 128];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[lookup_index(ALPHABET[i])] = i as u8;
        i += 1;
    }
    table
}

/// Slot in `REVERSE` consulted for `byte`.
///
/// Bytes at or above 0x80 alias onto the ASCII range through the 7-bit mask.
#[inline]
pub const fn lookup_index(byte: u8) -> usize {
    (byte.wrapping_sub(32) & 0x7F) as usize
}

/// Digit value of `byte`, or `None` when it is not a Z85 symbol.
#[inline]
pub fn digit_of(byte: u8) -> Option<u8> {
    if !byte.is_ascii() {
        return None;
    }
    match REVERSE[lookup_index(byte)] {
        INVALID => None,
        digit => Some(digit),
    }
}

/// Digit value of `byte` as the lenient decoder reads it.
///
/// Unknown symbols read as 0 and non-ASCII bytes alias through the mask,
/// which reproduces the reference decoder's output for malformed text.
#[inline]
pub fn lenient_digit(byte: u8) -> u8 {
    match REVERSE[lookup_index(byte)] {
        INVALID => 0,
        digit => digit,
    }
}

/// Whether `byte` is one of the 85 Z85 symbols.
#[inline]
pub fn is_z85_char(byte: u8) -> bool {
    digit_of(byte).is_some()
}
