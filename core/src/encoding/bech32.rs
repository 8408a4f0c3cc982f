//! # Bech32 Codec
//!
//! The checksummed text encoding for UMI addresses, wire-compatible with
//! BIP-173 Bech32. An encoded string has the shape:
//!
//! ```text
//! <hrp> '1' <data...> <checksum: 6 symbols>
//! ```
//!
//! where the human-readable part (HRP) names the network prefix, the data
//! part carries the payload repacked into 5-bit groups, and the checksum is
//! a BCH code over GF(32) that detects up to four character errors — which
//! matters when users are copy-pasting addresses into payment forms.
//!
//! ## Strictness
//!
//! The decoder is deliberately picky, because every leniency here is a
//! cross-implementation incompatibility waiting to happen:
//!
//! - total length is capped at 90 characters;
//! - the string must be single-case (all lower or all upper), and the
//!   separator is the *last* `'1'` scanning from the end;
//! - the HRP must be non-empty printable ASCII (33–126);
//! - trailing bit-padding in the data part must be shorter than 5 bits and
//!   all zero.
//!
//! Each failure mode gets its own [`CodecError`] variant — a wallet telling
//! a user "bad checksum, re-copy the address" is strictly more useful than
//! "decode error".

use super::CodecError;
use crate::config::{BECH32_CHECKSUM_LENGTH, BECH32_MAX_LENGTH};

/// The 32-symbol data alphabet. The ordering is part of the wire format.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// BCH generator constants for the checksum polymod.
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Checksum target. Bech32 proper uses 1 (Bech32m would use 0x2bc830a3).
const CHECKSUM_TARGET: u32 = 1;

/// Encode a payload under the given human-readable part.
///
/// The payload is repacked from 8-bit bytes to 5-bit symbols with zero
/// padding, the checksum is appended, and the result is normalized to
/// lowercase. Fails if the HRP is empty or non-printable, or if the total
/// encoded length would exceed 90 characters.
pub fn encode(hrp: &str, payload: &[u8]) -> Result<String, CodecError> {
    let hrp = check_hrp(hrp)?;

    let data = convert_bits(payload, 8, 5, true)?;

    let total = hrp.len() + 1 + data.len() + BECH32_CHECKSUM_LENGTH;
    if total > BECH32_MAX_LENGTH {
        return Err(CodecError::InvalidLength);
    }

    let checksum = create_checksum(&hrp, &data);

    let mut out = String::with_capacity(total);
    out.push_str(&hrp);
    out.push('1');
    for symbol in data.iter().chain(checksum.iter()) {
        out.push(char::from(CHARSET[usize::from(*symbol)]));
    }

    Ok(out)
}

/// Decode a Bech32 string into its human-readable part and payload bytes.
///
/// Accepts all-lowercase or all-uppercase input (never mixed), verifies the
/// checksum, and repacks the data part from 5-bit symbols back to bytes.
pub fn decode(s: &str) -> Result<(String, Vec<u8>), CodecError> {
    if s.len() > BECH32_MAX_LENGTH {
        return Err(CodecError::InvalidLength);
    }

    let has_lower = s.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = s.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(CodecError::MixedCase);
    }

    let lowered = s.to_ascii_lowercase();

    // The separator is the last '1'; the HRP itself may contain '1's.
    let separator = match lowered.rfind('1') {
        Some(pos) => pos,
        None => {
            return Err(CodecError::InvalidCharacter {
                position: lowered.len(),
            })
        }
    };

    if separator == 0 {
        // Empty HRP.
        return Err(CodecError::InvalidLength);
    }
    if lowered.len() - (separator + 1) < BECH32_CHECKSUM_LENGTH {
        // Data part too short to even hold a checksum.
        return Err(CodecError::InvalidLength);
    }

    let hrp = check_hrp(&lowered[..separator])?;

    let mut data = Vec::with_capacity(lowered.len() - separator - 1);
    for (offset, b) in lowered.bytes().enumerate().skip(separator + 1) {
        match CHARSET.iter().position(|&c| c == b) {
            Some(index) => data.push(index as u8),
            None => return Err(CodecError::InvalidCharacter { position: offset }),
        }
    }

    if !verify_checksum(&hrp, &data) {
        return Err(CodecError::InvalidChecksum);
    }

    let payload_symbols = &data[..data.len() - BECH32_CHECKSUM_LENGTH];
    let payload = convert_bits(payload_symbols, 5, 8, false)?;

    Ok((hrp, payload))
}

/// Validate and lowercase an HRP: non-empty, printable ASCII 33–126.
fn check_hrp(hrp: &str) -> Result<String, CodecError> {
    if hrp.is_empty() {
        return Err(CodecError::InvalidLength);
    }

    for (position, b) in hrp.bytes().enumerate() {
        if !(33..=126).contains(&b) {
            return Err(CodecError::InvalidCharacter { position });
        }
    }

    Ok(hrp.to_ascii_lowercase())
}

/// Regroup a bit stream between symbol widths.
///
/// Encoding (8 → 5) pads the final symbol with zeros. Decoding (5 → 8)
/// forbids padding of a full symbol or with non-zero bits, exactly as the
/// reference decoder does.
fn convert_bits(input: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, CodecError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max = (1u32 << to) - 1;
    let mut out = Vec::with_capacity((input.len() * from as usize + to as usize - 1) / to as usize);

    for &value in input {
        if u32::from(value) >> from != 0 {
            // A symbol wider than the declared width — caller bug territory,
            // but we reject rather than truncate.
            return Err(CodecError::InvalidCharacter { position: 0 });
        }
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            out.push((acc >> bits & max) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push((acc << (to - bits) & max) as u8);
        }
    } else if bits >= from || acc << (to - bits) & max != 0 {
        return Err(CodecError::InvalidLength);
    }

    Ok(out)
}

/// The BCH polymod at the heart of the checksum.
fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &value in values {
        let top = chk >> 25;
        chk = (chk & 0x01ff_ffff) << 5 ^ u32::from(value);
        for (i, gen) in GENERATOR.iter().enumerate() {
            if top >> i & 1 == 1 {
                chk ^= gen;
            }
        }
    }
    chk
}

/// Expand the HRP for checksum computation: high 3 bits of each character,
/// a zero, then the low 5 bits of each character.
fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; BECH32_CHECKSUM_LENGTH] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0; BECH32_CHECKSUM_LENGTH]);

    let residue = polymod(&values) ^ CHECKSUM_TARGET;

    let mut checksum = [0u8; BECH32_CHECKSUM_LENGTH];
    for (i, symbol) in checksum.iter_mut().enumerate() {
        *symbol = (residue >> (5 * (5 - i)) & 0x1f) as u8;
    }
    checksum
}

fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    polymod(&values) == CHECKSUM_TARGET
}

#[cfg(test)]
mod tests {
    use super::*;

    // The BIP-173 reference vectors. Anyone touching the codec reruns these
    // before doing anything else.
    const VALID: &[&str] = &[
        "A12UEL5L",
        "an83characterlonghumanreadablepartthatcontainsthenumber1andtheexcludedcharactersbio1tt5tgs",
        "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw",
        "11qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqc8247j",
        "split1checkupstagehandshakeupstreamerranterredcaperred2y9e3w",
    ];

    #[test]
    fn reference_vectors_decode_and_reencode() {
        for s in VALID {
            let (hrp, payload) = decode(s).unwrap_or_else(|e| panic!("{s}: {e}"));
            let reencoded = encode(&hrp, &payload).unwrap();
            assert_eq!(reencoded, s.to_ascii_lowercase(), "vector {s}");
        }
    }

    #[test]
    fn corrupted_checksum_rejected() {
        assert_eq!(
            decode("split1checkupstagehandshakeupstreamerranterredcaperred2y9e2w"),
            Err(CodecError::InvalidChecksum)
        );
    }

    #[test]
    fn bad_characters_rejected() {
        // Space in the HRP.
        assert!(matches!(
            decode("s lit1checkupstagehandshakeupstreamerranterredcaperredp8hs2p"),
            Err(CodecError::InvalidCharacter { .. })
        ));
        // DEL in the HRP.
        assert!(matches!(
            decode("spl\u{7f}t1checkupstagehandshakeupstreamerranterredcaperred2y9e3w"),
            Err(CodecError::InvalidCharacter { .. })
        ));
        // 'o' is not in the data alphabet.
        assert!(matches!(
            decode("split1cheo2y9e2w"),
            Err(CodecError::InvalidCharacter { .. })
        ));
        // No separator at all.
        assert!(matches!(
            decode("qpzry9x8gf2tvdw0"),
            Err(CodecError::InvalidCharacter { .. })
        ));
    }

    #[test]
    fn shape_violations_rejected() {
        // Data part shorter than the checksum.
        assert_eq!(decode("split1a2y9w"), Err(CodecError::InvalidLength));
        // Empty HRP.
        assert_eq!(
            decode("1checkupstagehandshakeupstreamerranterredcaperred2y9e3w"),
            Err(CodecError::InvalidLength)
        );
        // 91 characters.
        let long = "11qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqsqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqc8247j";
        assert_eq!(decode(long), Err(CodecError::InvalidLength));
    }

    #[test]
    fn mixed_case_rejected() {
        assert_eq!(decode("A12uEL5L"), Err(CodecError::MixedCase));
        assert_eq!(
            decode("Abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw"),
            Err(CodecError::MixedCase)
        );
    }

    #[test]
    fn uppercase_decodes_and_normalizes() {
        let (hrp, payload) = decode("A12UEL5L").unwrap();
        assert_eq!(hrp, "a");
        assert!(payload.is_empty());
        assert_eq!(encode(&hrp, &payload).unwrap(), "a12uel5l");
    }

    #[test]
    fn payload_roundtrip() {
        let payload: Vec<u8> = (0u8..=255).collect();
        // 256 bytes is way past the 90-char cap; use a slice that fits.
        let payload = &payload[..48];
        let encoded = encode("umi", payload).unwrap();
        let (hrp, decoded) = decode(&encoded).unwrap();
        assert_eq!(hrp, "umi");
        assert_eq!(decoded, payload);
    }

    #[test]
    fn every_single_character_flip_is_caught() {
        let original = "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw";
        for i in 0..original.len() {
            for replacement in "qpzry9x8gf2tvdw0s3jn54khce6mua7l".bytes() {
                let mut flipped = original.as_bytes().to_vec();
                if flipped[i] == replacement {
                    continue;
                }
                flipped[i] = replacement;
                let flipped = String::from_utf8(flipped).unwrap();
                assert!(
                    decode(&flipped).is_err(),
                    "flip at {i} to {} went undetected",
                    char::from(replacement)
                );
            }
        }
    }

    #[test]
    fn oversized_payload_rejected_on_encode() {
        // 64 payload bytes -> 103 data symbols; far past 90 total.
        assert_eq!(encode("umi", &[0u8; 64]), Err(CodecError::InvalidLength));
    }

    #[test]
    fn invalid_padding_rejected() {
        // Hand-build a string with a correct checksum but a data part of a
        // single symbol: five leftover bits is a full group of padding,
        // which the decoder must refuse even though the checksum passes.
        let hrp = "umi";
        let data = vec![31u8];
        let checksum = create_checksum(hrp, &data);
        let mut s = String::from("umi1l");
        for symbol in checksum {
            s.push(char::from(CHARSET[usize::from(symbol)]));
        }
        assert_eq!(decode(&s), Err(CodecError::InvalidLength));
    }
}
