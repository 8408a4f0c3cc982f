//! # Address Records
//!
//! A UMI address is a fixed 34-byte buffer:
//!
//! ```text
//! ┌──────────────────┬────────────────────────────┐
//! │ version: u16 BE  │ public_key: [u8; 32]       │
//! │ bytes 0..2       │ bytes 2..34                │
//! └──────────────────┴────────────────────────────┘
//! ```
//!
//! The version fully determines the display prefix via the prefix codec, so
//! an address carries its network in-band: `"umi"` addresses are version
//! 21929, the genesis address is version 0, and so on. For humans the whole
//! record is rendered as a Bech32 string with the prefix as HRP and the key
//! as payload.
//!
//! Addresses are plain values — `Copy`, immutable once you stop calling
//! setters, and freely shareable. There is no hidden state and no heap.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{ADDRESS_LENGTH, PUBLIC_KEY_LENGTH, VERSION_UMI};
use crate::crypto::PublicKey;
use crate::encoding::{bech32, prefix_to_version, version_to_prefix, CodecError};

/// Errors constructing or rendering an address.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AddressError {
    /// A raw buffer of the wrong size. 34 bytes, no more, no less — we do
    /// not silently truncate or zero-extend.
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// The decoded Bech32 payload was not a 32-byte public key.
    #[error("invalid payload length: expected {expected} bytes, got {got}")]
    InvalidPayloadLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// A text-encoding failure from the Bech32 or prefix codec.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

/// A 34-byte address record: big-endian u16 version plus Ed25519 public key.
///
/// # Examples
///
/// ```
/// use umi_core::address::Address;
///
/// let addr = Address::from_bech32(
///     "umi1u3dam33jaf64z4s008g7su62j4za72ljqff9dthsataq8k806nfsgrhdhg",
/// )
/// .unwrap();
/// assert_eq!(addr.prefix().unwrap(), "umi");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address {
    bytes: [u8; ADDRESS_LENGTH],
}

impl Address {
    /// The fixed byte length of every address record.
    pub const LENGTH: usize = ADDRESS_LENGTH;

    /// Create a zeroed address with the mainnet `"umi"` version.
    pub fn new() -> Self {
        let mut addr = Self {
            bytes: [0; ADDRESS_LENGTH],
        };
        addr.set_version(VERSION_UMI);
        addr
    }

    /// Copy an address from a raw byte slice.
    ///
    /// The slice must be exactly 34 bytes. Short or long input is an error,
    /// not a truncation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_LENGTH] =
            bytes.try_into().map_err(|_| AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    /// Build a mainnet address for a public key.
    pub fn from_key(key: &PublicKey) -> Self {
        let mut addr = Self::new();
        addr.set_public_key(key);
        addr
    }

    /// Parse a Bech32 address string.
    ///
    /// The HRP becomes the version via the prefix codec and the payload
    /// becomes the public key, so the round trip through
    /// [`to_bech32`](Self::to_bech32) is byte-exact.
    pub fn from_bech32(s: &str) -> Result<Self, AddressError> {
        let (hrp, payload) = bech32::decode(s)?;
        if payload.len() != PUBLIC_KEY_LENGTH {
            return Err(AddressError::InvalidPayloadLength {
                expected: PUBLIC_KEY_LENGTH,
                got: payload.len(),
            });
        }

        let mut addr = Self {
            bytes: [0; ADDRESS_LENGTH],
        };
        addr.set_version(prefix_to_version(&hrp)?);
        addr.bytes[2..].copy_from_slice(&payload);
        Ok(addr)
    }

    /// Render the address as a Bech32 string.
    ///
    /// Fails only if the stored version has no prefix representation (a
    /// field outside 1–26), which can happen for addresses built from
    /// arbitrary raw bytes.
    pub fn to_bech32(&self) -> Result<String, AddressError> {
        let hrp = version_to_prefix(self.version())?;
        Ok(bech32::encode(&hrp, &self.bytes[2..])?)
    }

    /// The 15-bit version stored in bytes 0–1.
    pub fn version(&self) -> u16 {
        u16::from_be_bytes([self.bytes[0], self.bytes[1]])
    }

    /// Overwrite the version field.
    pub fn set_version(&mut self, version: u16) -> &mut Self {
        self.bytes[..2].copy_from_slice(&version.to_be_bytes());
        self
    }

    /// The display prefix derived from the version.
    pub fn prefix(&self) -> Result<String, CodecError> {
        version_to_prefix(self.version())
    }

    /// Set the version by display prefix.
    pub fn set_prefix(&mut self, prefix: &str) -> Result<&mut Self, CodecError> {
        self.set_version(prefix_to_version(prefix)?);
        Ok(self)
    }

    /// The public key stored in bytes 2–33.
    pub fn public_key(&self) -> PublicKey {
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(&self.bytes[2..]);
        PublicKey::from_bytes(key)
    }

    /// Overwrite the public key field.
    pub fn set_public_key(&mut self, key: &PublicKey) -> &mut Self {
        self.bytes[2..].copy_from_slice(key.as_bytes());
        self
    }

    /// Copy the raw 34 bytes out.
    pub fn to_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        self.bytes
    }

    /// Borrow the raw 34 bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.bytes
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Addresses with an unrepresentable version still need to print
        // somehow; hex is the honest fallback.
        match self.to_bech32() {
            Ok(s) => write!(f, "{s}"),
            Err(_) => write!(f, "0x{}", hex::encode(self.bytes)),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            let s = self.to_bech32().map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&s)
        } else {
            serializer.serialize_bytes(&self.bytes)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            Address::from_bech32(&s).map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            Address::from_bytes(&bytes).map_err(serde::de::Error::custom)
        }
    }
}
