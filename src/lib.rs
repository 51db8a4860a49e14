//! Z85: the ZeroMQ base-85 text encoding (spec:32/Z85).
//!
//! Every 4 bytes become 5 printable ASCII characters. Input whose length is
//! not a multiple of 4 can be encoded with [`Padding::Auto`], which
//! zero-fills the last frame and appends the fill count (`1`..`3`) as a
//! trailing digit so decoding restores the exact original length.
//!
//! The crate provides:
//! - The transcoder (`codec`) over whole in-memory buffers
//! - The alphabet tables (`alphabet`) and single-frame transforms (`frame`)
//! - File and reader/writer helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use z85::{Padding, decode, encode};
//!
//! let text = encode(b"HelloWorld", Padding::Auto).unwrap();
//! assert_eq!(text.len(), 16);
//! assert_eq!(decode(&text).unwrap(), b"HelloWorld");
//! ```

pub mod alphabet;
pub mod codec;
pub mod frame;
pub mod io;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{
    DecodeError, DecodeMode, EncodeError, Padding, decode, decode_with, decoded_len, encode,
    encode_padded, encoded_len,
};
