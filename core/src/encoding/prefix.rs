//! # Prefix Codec
//!
//! A bijection between the 15-bit address version and its 3-letter display
//! prefix. Each letter is a 5-bit code in a 1-based alphabet (`'a'` = 1,
//! `'z'` = 26), packed big-end first:
//!
//! ```text
//! version = (c0 << 10) | (c1 << 5) | c2
//! ```
//!
//! Version 0 is reserved and displays as the string `"genesis"` instead of
//! a letter triple. The packing means `"umi"` is version 21929, `"aaa"` is
//! 1057, and `"zzz"` is 27482 — every non-genesis prefix round-trips
//! exactly.
//!
//! Malformed input is rejected with a [`CodecError`], not mapped to
//! garbage: codes 0 and 27–31 don't correspond to letters, and a version
//! with its top bit set can't have come from three letters.

use super::CodecError;
use crate::config::PREFIX_GENESIS;

/// Convert a display prefix to its 15-bit version.
///
/// `"genesis"` maps to version 0. Anything else must be exactly three ASCII
/// lowercase letters.
pub fn prefix_to_version(prefix: &str) -> Result<u16, CodecError> {
    if prefix == PREFIX_GENESIS {
        return Ok(0);
    }

    let bytes = prefix.as_bytes();
    if bytes.len() != 3 {
        return Err(CodecError::InvalidLength);
    }

    let mut version: u16 = 0;
    for (position, &b) in bytes.iter().enumerate() {
        if !b.is_ascii_lowercase() {
            return Err(CodecError::InvalidCharacter { position });
        }
        version = (version << 5) | u16::from(b - b'a' + 1);
    }

    Ok(version)
}

/// Convert a 15-bit version back to its display prefix.
///
/// Version 0 maps to `"genesis"`. For any other version, all three 5-bit
/// fields must decode to letters; versions that can't be produced by
/// [`prefix_to_version`] are rejected rather than stringified into
/// nonsense.
pub fn version_to_prefix(version: u16) -> Result<String, CodecError> {
    if version == 0 {
        return Ok(PREFIX_GENESIS.to_string());
    }

    let mut prefix = String::with_capacity(3);
    for position in 0..3 {
        // Leave the high bit in the first field so a version outside the
        // 15-bit range fails the 1..=26 check instead of being masked away.
        let code = version >> (10 - position * 5) & if position == 0 { 0x3F } else { 0x1F };
        if !(1..=26).contains(&code) {
            return Err(CodecError::InvalidCharacter { position });
        }
        prefix.push(char::from(b'a' + code as u8 - 1));
    }

    Ok(prefix)
}
