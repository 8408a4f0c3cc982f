//! # Text Encodings
//!
//! The human-facing side of the wire format: the Bech32 codec that turns a
//! 34-byte address into something a person can read aloud without crying,
//! and the prefix codec that packs a 3-letter network prefix into the
//! address's 15-bit version field.
//!
//! Both codecs share one error taxonomy, [`CodecError`], because a caller
//! handling a malformed address string doesn't care which layer choked —
//! it cares whether the problem was length, charset, checksum or casing.

use thiserror::Error;

pub mod bech32;
pub mod prefix;

pub use prefix::{prefix_to_version, version_to_prefix};

/// Errors produced while encoding or decoding address text.
///
/// The variants are deliberately distinguishable: wallet UIs show different
/// guidance for "you typed a bad character" versus "the checksum doesn't
/// match, re-copy the address".
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// The input's overall shape is wrong: too long, too short, an empty
    /// human-readable part, or bit-padding that doesn't zero out.
    #[error("invalid length")]
    InvalidLength,

    /// A character outside the allowed set, a control/DEL character, or a
    /// missing `'1'` separator.
    #[error("invalid character at position {position}")]
    InvalidCharacter {
        /// Byte offset of the offending character in the input.
        position: usize,
    },

    /// The 6-symbol checksum did not verify. A single flipped bit anywhere
    /// in the string lands here.
    #[error("invalid checksum")]
    InvalidChecksum,

    /// The string mixes upper- and lowercase. Bech32 strings are single-case
    /// by definition; mixing defeats the checksum's error-detection model.
    #[error("mixed-case string")]
    MixedCase,
}
