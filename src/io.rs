// Reader/writer and file-level helpers around the in-memory codec.
//
// Input is read fully into memory before transcoding. Encoded output can be
// wrapped into fixed-width lines; decoding drops ASCII whitespace first, so
// wrapped text and a trailing newline both decode cleanly. With the
// `file-io` feature, the binary side of each operation is hashed with
// SHA-256 for the returned stats.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::codec::{self, DecodeError, DecodeMode, EncodeError, Padding};
use crate::frame::FRAME_LEN;

// ---------------------------------------------------------------------------
// Options and stats
// ---------------------------------------------------------------------------

/// Settings for `encode_stream()` / `encode_file()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Padding policy for misaligned input.
    pub padding: Padding,
    /// Insert a newline after every `wrap` characters (0 disables wrapping).
    pub wrap: usize,
}

/// Statistics returned by `encode_stream()` / `encode_file()`.
#[derive(Debug, Clone)]
pub struct EncodeStats {
    /// Binary input size in bytes.
    pub input_size: u64,
    /// Text bytes written, including any line breaks.
    pub output_size: u64,
    /// Zero bytes appended before encoding (0..=3).
    pub padding: usize,
    /// SHA-256 of the binary input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decode_stream()` / `decode_file()`.
#[derive(Debug, Clone)]
pub struct DecodeStats {
    /// Text input size in bytes, whitespace included.
    pub input_size: u64,
    /// Decoded output size in bytes.
    pub output_size: u64,
    /// Padding bytes removed as told by the trailing marker (0..=3).
    pub padding: usize,
    /// SHA-256 of the decoded output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for reader/writer and file operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Encoding error.
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    /// Decoding error.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Read all of `reader`, encode it and write the text to `writer`.
pub fn encode_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    opts: EncodeOptions,
) -> Result<EncodeStats, IoError> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let text = codec::encode(&data, opts.padding)?;
    let output_size = write_wrapped(&mut writer, text.as_bytes(), opts.wrap)?;
    writer.flush()?;

    let padding = match data.len() % FRAME_LEN {
        0 => 0,
        rem => FRAME_LEN - rem,
    };
    debug!(
        "z85 encode_stream: {} bytes in, {output_size} bytes out, wrap {}",
        data.len(),
        opts.wrap
    );

    Ok(EncodeStats {
        input_size: data.len() as u64,
        output_size,
        padding,
        input_sha256: sha256(&data),
    })
}

/// Read all of `reader`, decode it and write the bytes to `writer`.
///
/// ASCII whitespace is removed before decoding.
pub fn decode_stream<R: Read, W: Write>(
    mut reader: R,
    mut writer: W,
    mode: DecodeMode,
) -> Result<DecodeStats, IoError> {
    let mut text = Vec::new();
    reader.read_to_end(&mut text)?;
    let input_size = text.len() as u64;
    text.retain(|b| !b.is_ascii_whitespace());

    let data = codec::decode_with(&text, mode)?;
    writer.write_all(&data)?;
    writer.flush()?;

    let padding = codec::decoded_len(text.len()).map_or(0, |max| max - data.len());
    debug!(
        "z85 decode_stream: {input_size} bytes in ({} significant), {} bytes out",
        text.len(),
        data.len()
    );

    Ok(DecodeStats {
        input_size,
        output_size: data.len() as u64,
        padding,
        output_sha256: sha256(&data),
    })
}

/// Write `text` to `writer`, breaking it into lines of `wrap` characters.
/// Returns the number of bytes written.
fn write_wrapped<W: Write>(writer: &mut W, text: &[u8], wrap: usize) -> io::Result<u64> {
    if wrap == 0 {
        writer.write_all(text)?;
        return Ok(text.len() as u64);
    }
    let mut written = 0u64;
    for line in text.chunks(wrap) {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
        written += line.len() as u64 + 1;
    }
    Ok(written)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Encode the file at `input_path` into Z85 text at `output_path`.
///
/// The output file is only created once the input has encoded successfully.
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    opts: EncodeOptions,
) -> Result<EncodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut text = Vec::new();
    let stats = encode_stream(reader, &mut text, opts)?;

    write_file(output_path, &text)?;
    Ok(stats)
}

/// Decode the Z85 text file at `input_path` into `output_path`.
///
/// The output file is only created once the input has decoded successfully.
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    mode: DecodeMode,
) -> Result<DecodeStats, IoError> {
    let reader = BufReader::with_capacity(BUF_SIZE, File::open(input_path)?);
    let mut data = Vec::new();
    let stats = decode_stream(reader, &mut data, mode)?;

    write_file(output_path, &data)?;
    Ok(stats)
}

fn write_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::with_capacity(BUF_SIZE, File::create(path)?);
    writer.write_all(contents)?;
    writer.flush()
}

// ---------------------------------------------------------------------------
// Checksums (file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    use sha2::{Digest, Sha256};
    Some(Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn stream_roundtrip_padded() {
        let data = b"The quick brown fox jumps over the lazy dog.!";
        let mut text = Vec::new();
        let enc = encode_stream(
            &data[..],
            &mut text,
            EncodeOptions {
                padding: Padding::Auto,
                wrap: 0,
            },
        )
        .unwrap();
        assert_eq!(enc.input_size, data.len() as u64);
        assert_eq!(enc.output_size, text.len() as u64);
        assert_eq!(enc.padding, 3);

        let mut out = Vec::new();
        let dec = decode_stream(text.as_slice(), &mut out, DecodeMode::Strict).unwrap();
        assert_eq!(out, data);
        assert_eq!(dec.padding, 3);
        assert_eq!(dec.output_size, data.len() as u64);
    }

    #[test]
    fn wrapped_output_decodes() {
        let data: Vec<u8> = (0..=255u8).collect();
        let mut text = Vec::new();
        encode_stream(
            data.as_slice(),
            &mut text,
            EncodeOptions {
                padding: Padding::Disabled,
                wrap: 76,
            },
        )
        .unwrap();
        let lines: Vec<&[u8]> = text.split(|&b| b == b'\n').collect();
        // 320 chars -> 4 full lines + 16, each newline-terminated.
        assert_eq!(lines.len(), 6);
        assert!(lines[..4].iter().all(|l| l.len() == 76));
        assert_eq!(lines[4].len(), 16);
        assert!(lines[5].is_empty());

        let mut out = Vec::new();
        decode_stream(text.as_slice(), &mut out, DecodeMode::Strict).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn trailing_newline_is_ignored() {
        let mut out = Vec::new();
        let stats = decode_stream(&b"HelloWorld\n"[..], &mut out, DecodeMode::Compatible).unwrap();
        assert_eq!(out, [0x86, 0x4F, 0xD2, 0x6F, 0xB5, 0x59, 0xF7, 0x5B]);
        assert_eq!(stats.input_size, 11);
        assert_eq!(stats.padding, 0);
    }

    #[test]
    fn unaligned_stream_without_padding_fails() {
        let err = encode_stream(&b"abc"[..], Vec::new(), EncodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            IoError::Encode(EncodeError::UnalignedLength { len: 3 })
        ));
    }

    #[test]
    fn encode_decode_file_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.bin");
        let text = dir.path().join("input.z85");
        let output = dir.path().join("output.bin");
        let data = b"standalone payload of odd length!";
        std::fs::write(&input, data).unwrap();

        let enc = encode_file(
            &input,
            &text,
            EncodeOptions {
                padding: Padding::Auto,
                wrap: 0,
            },
        )
        .unwrap();
        assert_eq!(enc.input_size, data.len() as u64);
        assert_eq!(
            std::fs::read(&text).unwrap().len() as u64,
            enc.output_size
        );

        let dec = decode_file(&text, &output, DecodeMode::Compatible).unwrap();
        assert_eq!(dec.output_size, data.len() as u64);
        assert_eq!(std::fs::read(&output).unwrap(), data);
    }

    #[test]
    fn failed_decode_leaves_no_output_file() {
        let dir = tempdir().unwrap();
        let text = dir.path().join("bad.z85");
        let output = dir.path().join("out.bin");
        std::fs::write(&text, "WrongSize").unwrap();

        let err = decode_file(&text, &output, DecodeMode::Compatible).unwrap_err();
        assert!(matches!(
            err,
            IoError::Decode(DecodeError::InvalidLength { len: 9 })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn failed_encode_leaves_output_untouched() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("odd.bin");
        let output = dir.path().join("keep.z85");
        std::fs::write(&input, b"abc").unwrap();
        std::fs::write(&output, b"precious").unwrap();

        let err = encode_file(&input, &output, EncodeOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            IoError::Encode(EncodeError::UnalignedLength { len: 3 })
        ));
        assert_eq!(std::fs::read(&output).unwrap(), b"precious");
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = tempdir().unwrap();
        let err = encode_file(
            &dir.path().join("absent.bin"),
            &dir.path().join("out.z85"),
            EncodeOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IoError::Io(_)));
    }

    #[cfg(feature = "file-io")]
    #[test]
    fn sha256_checksums_computed() {
        let data = b"checksum test data";
        let mut text = Vec::new();
        let enc = encode_stream(
            &data[..],
            &mut text,
            EncodeOptions {
                padding: Padding::Auto,
                wrap: 0,
            },
        )
        .unwrap();
        let dec = decode_stream(text.as_slice(), Vec::new(), DecodeMode::Compatible).unwrap();

        assert!(enc.input_sha256.is_some());
        // The decoded SHA-256 should match the SHA-256 of the original input.
        assert_eq!(dec.output_sha256, enc.input_sha256);
    }
}
