// Whole-buffer Z85 encoding and decoding.
//
// `encode` handles the padding policy and hands frame-aligned input to the
// core transform; `decode` validates length and padding marker, transcodes
// every complete group, then drops the padding bytes.
//
// With the `parallel` feature, buffers of at least `PARALLEL_THRESHOLD`
// bytes are split into frame-aligned blocks transcoded on the rayon pool.

use log::{debug, log_enabled, trace, warn};
use thiserror::Error;

use crate::alphabet;
use crate::frame::{self, FRAME_LEN, GROUP_LEN, GroupError};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Input size (bytes) from which the parallel path is taken.
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 1 << 20;

/// Frames per parallel work unit (256 KiB of binary data).
#[cfg(feature = "parallel")]
const FRAMES_PER_BLOCK: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How `encode` treats input whose length is not a multiple of 4.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Padding {
    /// Reject misaligned input.
    #[default]
    Disabled,
    /// Zero-fill the last frame and append the fill count as a digit.
    Auto,
}

/// How `decode_with` treats symbols outside the alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Accept any byte: unknown symbols read as digit 0 and group values
    /// wrap modulo 2^32. Output matches the reference decoder.
    #[default]
    Compatible,
    /// Reject unknown symbols and groups above `u32::MAX`.
    Strict,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Input length is not a multiple of 4 and padding is disabled.
    #[error("input length {len} is not a multiple of 4 (enable padding to encode it)")]
    UnalignedLength { len: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Length is neither a multiple of 5 nor one more than a multiple of 5,
    /// or a padding marker has no group in front of it.
    #[error("invalid Z85 string length {len}")]
    InvalidLength { len: usize },
    /// Trailing padding marker is not one of `1`, `2`, `3`.
    #[error("invalid padding character {byte:#04x} (expected '1', '2' or '3')")]
    InvalidPadding { byte: u8 },
    /// Strict mode: byte at `position` is not a Z85 symbol.
    #[error("invalid Z85 character {byte:#04x} at offset {position}")]
    InvalidCharacter { byte: u8, position: usize },
    /// Strict mode: the group starting at `position` exceeds 32 bits.
    #[error("Z85 group at offset {position} exceeds 32 bits")]
    GroupOverflow { position: usize },
}

impl DecodeError {
    fn from_group(err: GroupError, group_offset: usize) -> Self {
        match err {
            GroupError::InvalidCharacter { index, byte } => Self::InvalidCharacter {
                byte,
                position: group_offset + index,
            },
            GroupError::Overflow => Self::GroupOverflow {
                position: group_offset,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Size helpers
// ---------------------------------------------------------------------------

/// Encoded length of `input_len` bytes, or `None` if `padding` is disabled
/// and the input is misaligned.
pub fn encoded_len(input_len: usize, padding: Padding) -> Option<usize> {
    let rem = input_len % FRAME_LEN;
    match (rem, padding) {
        (0, _) => Some(input_len / FRAME_LEN * GROUP_LEN),
        (_, Padding::Disabled) => None,
        (_, Padding::Auto) => Some(input_len.div_ceil(FRAME_LEN) * GROUP_LEN + 1),
    }
}

/// Decoded length of a text of `text_len` bytes before padding removal, or
/// `None` if no valid Z85 text has that length.
///
/// The exact result is this value minus the padding marker (0..=3).
pub fn decoded_len(text_len: usize) -> Option<usize> {
    match text_len % GROUP_LEN {
        0 => Some(text_len / GROUP_LEN * FRAME_LEN),
        1 if text_len > 1 => Some(text_len / GROUP_LEN * FRAME_LEN),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode `data` as Z85 text.
///
/// Empty input encodes to the empty string whatever the padding setting.
///
/// ```
/// use z85::{Padding, encode};
///
/// let frames = [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B];
/// assert_eq!(encode(&frames, Padding::Disabled).unwrap(), "HelloWorld");
/// assert_eq!(encode(b"Hi", Padding::Auto).unwrap().len(), 6);
/// ```
pub fn encode(data: &[u8], padding: Padding) -> Result<String, EncodeError> {
    let len = data.len();
    let Some(capacity) = encoded_len(len, padding) else {
        return Err(EncodeError::UnalignedLength { len });
    };
    Ok(encode_into_string(data, capacity))
}

/// Encode `data` with `Padding::Auto`. Never fails.
pub fn encode_padded(data: &[u8]) -> String {
    let capacity = encoded_len(data.len(), Padding::Auto).unwrap_or_default();
    encode_into_string(data, capacity)
}

fn encode_into_string(data: &[u8], capacity: usize) -> String {
    trace!("z85 encode: {} bytes -> {capacity} chars", data.len());
    let (frames, tail) = data.as_chunks::<FRAME_LEN>();
    let mut out = String::with_capacity(capacity);
    encode_frames(frames, &mut out);

    if !tail.is_empty() {
        let fill = FRAME_LEN - tail.len();
        let mut last = [0u8; FRAME_LEN];
        last[..tail.len()].copy_from_slice(tail);
        push_group(&mut out, &frame::encode_frame(last));
        out.push(char::from(b'0' + fill as u8));
        debug!("z85 encode: appended {fill} padding byte(s)");
    }
    out
}

#[inline]
fn push_group(out: &mut String, group: &[u8; GROUP_LEN]) {
    out.extend(group.iter().copied().map(char::from));
}

fn encode_frames_seq(frames: &[[u8; FRAME_LEN]], out: &mut String) {
    for &f in frames {
        push_group(out, &frame::encode_frame(f));
    }
}

#[cfg(not(feature = "parallel"))]
fn encode_frames(frames: &[[u8; FRAME_LEN]], out: &mut String) {
    encode_frames_seq(frames, out);
}

#[cfg(feature = "parallel")]
fn encode_frames(frames: &[[u8; FRAME_LEN]], out: &mut String) {
    if frames.len() * FRAME_LEN < PARALLEL_THRESHOLD {
        encode_frames_seq(frames, out);
        return;
    }
    debug!("z85 encode: parallel path for {} frames", frames.len());
    let blocks: Vec<String> = frames
        .par_chunks(FRAMES_PER_BLOCK)
        .map(|block| {
            let mut s = String::with_capacity(block.len() * GROUP_LEN);
            encode_frames_seq(block, &mut s);
            s
        })
        .collect();
    for block in &blocks {
        out.push_str(block);
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode Z85 text in `DecodeMode::Compatible`.
///
/// ```
/// let bytes = z85::decode("HelloWorld").unwrap();
/// assert_eq!(bytes, [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B]);
/// ```
pub fn decode<T: AsRef<[u8]> + ?Sized>(text: &T) -> Result<Vec<u8>, DecodeError> {
    decode_with(text, DecodeMode::Compatible)
}

/// Decode Z85 text with an explicit `mode`.
///
/// Length is counted in bytes. A trailing `1`..`3` after the last complete
/// group is the padding marker and removes that many bytes from the output.
pub fn decode_with<T: AsRef<[u8]> + ?Sized>(
    text: &T,
    mode: DecodeMode,
) -> Result<Vec<u8>, DecodeError> {
    let text = text.as_ref();
    let len = text.len();
    let (body, fill) = split_padding(text)?;
    trace!("z85 decode: {len} chars, {fill} padding byte(s), {mode:?}");

    let (groups, rest) = body.as_chunks::<GROUP_LEN>();
    debug_assert!(rest.is_empty());

    let mut out = match mode {
        DecodeMode::Compatible => {
            if log_enabled!(log::Level::Warn)
                && let Some(position) = body.iter().position(|&c| !alphabet::is_z85_char(c))
            {
                warn!(
                    "z85 decode: byte {:#04x} at offset {position} is not a Z85 symbol; decoding leniently",
                    body[position]
                );
            }
            decode_groups_lenient(groups)
        }
        DecodeMode::Strict => decode_groups_strict(groups)?,
    };

    if fill > 0 {
        out.truncate(out.len() - fill);
        debug!("z85 decode: removed {fill} padding byte(s)");
    }
    Ok(out)
}

/// Split the padding marker off `text`, returning the group body and the
/// number of bytes to drop after decoding.
fn split_padding(text: &[u8]) -> Result<(&[u8], usize), DecodeError> {
    let len = text.len();
    match len % GROUP_LEN {
        0 => Ok((text, 0)),
        1 => {
            let Some((&marker, body)) = text.split_last() else {
                return Err(DecodeError::InvalidLength { len });
            };
            let fill = match marker {
                b'1'..=b'3' => usize::from(marker - b'0'),
                _ => return Err(DecodeError::InvalidPadding { byte: marker }),
            };
            if body.is_empty() {
                return Err(DecodeError::InvalidLength { len });
            }
            Ok((body, fill))
        }
        _ => Err(DecodeError::InvalidLength { len }),
    }
}

fn decode_groups_lenient_seq(groups: &[[u8; GROUP_LEN]], out: &mut Vec<u8>) {
    for g in groups {
        out.extend_from_slice(&frame::decode_group(g));
    }
}

fn decode_groups_strict_seq(
    groups: &[[u8; GROUP_LEN]],
    first_offset: usize,
    out: &mut Vec<u8>,
) -> Result<(), DecodeError> {
    for (i, g) in groups.iter().enumerate() {
        let bytes = frame::checked_decode_group(g)
            .map_err(|e| DecodeError::from_group(e, first_offset + i * GROUP_LEN))?;
        out.extend_from_slice(&bytes);
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn decode_groups_lenient(groups: &[[u8; GROUP_LEN]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * FRAME_LEN);
    decode_groups_lenient_seq(groups, &mut out);
    out
}

#[cfg(not(feature = "parallel"))]
fn decode_groups_strict(groups: &[[u8; GROUP_LEN]]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(groups.len() * FRAME_LEN);
    decode_groups_strict_seq(groups, 0, &mut out)?;
    Ok(out)
}

#[cfg(feature = "parallel")]
fn decode_groups_lenient(groups: &[[u8; GROUP_LEN]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(groups.len() * FRAME_LEN);
    if groups.len() * FRAME_LEN < PARALLEL_THRESHOLD {
        decode_groups_lenient_seq(groups, &mut out);
        return out;
    }
    debug!("z85 decode: parallel path for {} groups", groups.len());
    let blocks: Vec<Vec<u8>> = groups
        .par_chunks(FRAMES_PER_BLOCK)
        .map(|block| {
            let mut v = Vec::with_capacity(block.len() * FRAME_LEN);
            decode_groups_lenient_seq(block, &mut v);
            v
        })
        .collect();
    for block in &blocks {
        out.extend_from_slice(block);
    }
    out
}

#[cfg(feature = "parallel")]
fn decode_groups_strict(groups: &[[u8; GROUP_LEN]]) -> Result<Vec<u8>, DecodeError> {
    let mut out = Vec::with_capacity(groups.len() * FRAME_LEN);
    if groups.len() * FRAME_LEN < PARALLEL_THRESHOLD {
        decode_groups_strict_seq(groups, 0, &mut out)?;
        return Ok(out);
    }
    debug!("z85 decode: parallel path for {} groups", groups.len());
    // Collecting into `Result` short-circuits; rayon may then report a
    // later block's error, so rescan for the first one.
    let blocks: Result<Vec<Vec<u8>>, DecodeError> = groups
        .par_chunks(FRAMES_PER_BLOCK)
        .enumerate()
        .map(|(n, block)| {
            let mut v = Vec::with_capacity(block.len() * FRAME_LEN);
            decode_groups_strict_seq(block, n * FRAMES_PER_BLOCK * GROUP_LEN, &mut v)?;
            Ok(v)
        })
        .collect();
    match blocks {
        Ok(blocks) => {
            for block in &blocks {
                out.extend_from_slice(block);
            }
            Ok(out)
        }
        Err(_) => {
            out.clear();
            decode_groups_strict_seq(groups, 0, &mut out)?;
            Ok(out)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
