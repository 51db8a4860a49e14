// Frame <-> group transforms.
//
// A frame is 4 bytes read as a big-endian u32; a group is the 5 Z85 symbols
// spelling that value in base 85, most-significant digit first.

use thiserror::Error;

use crate::alphabet::{self, ALPHABET, RADIX};

/// Bytes per binary frame.
pub const FRAME_LEN: usize = 4;

/// Symbols per encoded group.
pub const GROUP_LEN: usize = 5;

/// Weight of the leading digit: 85^4.
const TOP_DIVISOR: u32 = RADIX * RADIX * RADIX * RADIX;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode one 4-byte frame into its 5-symbol group.
#[inline]
pub fn encode_frame(frame: [u8; FRAME_LEN]) -> [u8; GROUP_LEN] {
    let mut value = u32::from_be_bytes(frame);
    let mut divisor = TOP_DIVISOR;
    let mut group = [0u8; GROUP_LEN];
    for slot in &mut group {
        let digit = (value / divisor) % RADIX;
        *slot = ALPHABET[digit as usize];
        value -= digit * divisor;
        divisor /= RADIX;
    }
    group
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode one group without validation.
///
/// Unknown symbols count as digit 0 and the accumulator wraps modulo 2^32,
/// so any 5 bytes produce a frame.
#[inline]
pub fn decode_group(group: &[u8; GROUP_LEN]) -> [u8; FRAME_LEN] {
    let value = group.iter().fold(0u32, |acc, &c| {
        acc.wrapping_mul(RADIX)
            .wrapping_add(u32::from(alphabet::lenient_digit(c)))
    });
    value.to_be_bytes()
}

/// Decode one group, rejecting unknown symbols and values above `u32::MAX`.
pub fn checked_decode_group(group: &[u8; GROUP_LEN]) -> Result<[u8; FRAME_LEN], GroupError> {
    let mut value: u64 = 0;
    for (index, &c) in group.iter().enumerate() {
        let digit =
            alphabet::digit_of(c).ok_or(GroupError::InvalidCharacter { index, byte: c })?;
        value = value * u64::from(RADIX) + u64::from(digit);
    }
    let value = u32::try_from(value).map_err(|_| GroupError::Overflow)?;
    Ok(value.to_be_bytes())
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Failure decoding a single group in checked mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GroupError {
    /// Symbol at `index` (0..5 within the group) is not in the alphabet.
    #[error("byte {byte:#04x} at group index {index} is not a Z85 symbol")]
    InvalidCharacter { index: usize, byte: u8 },
    /// Group value does not fit in 32 bits.
    #[error("group value exceeds 32 bits")]
    Overflow,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
