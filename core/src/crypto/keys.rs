//! # Key Management
//!
//! Ed25519 key handling for record signing and verification.
//!
//! Two deliberate oddities, both inherited from the wire format:
//!
//! 1. A [`SecretKey`] serializes to 64 bytes — the 32-byte seed followed by
//!    the 32-byte public key. That is the layout every other UMI
//!    implementation stores and exchanges, so it is the layout we speak.
//! 2. A [`PublicKey`] holds *raw* bytes and does not insist on being a valid
//!    curve point. Addresses carry arbitrary 32-byte keys copied straight
//!    off the wire; whether they decompress to a point is only decided at
//!    verification time, where a bad point simply fails to verify.
//!
//! Key bytes are never logged. If you add logging to this module, you will
//! be asked to leave.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use thiserror::Error;

use crate::config::{PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH, SEED_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed — leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: not a consistent Ed25519 keypair")]
    InvalidSecretKey,
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

/// The public half of an Ed25519 keypair, safe to share with the world.
///
/// Stored as raw bytes rather than a parsed curve point, because public keys
/// arrive embedded in 34-byte address records and 167-byte block headers
/// where any bit pattern is representable. Parsing happens lazily inside
/// [`verify`](Self::verify); bytes that don't decode to a valid point
/// verify nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    /// Wrap raw public key bytes. Always succeeds; validity is checked at
    /// verification time.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Verify an Ed25519 signature over `message`.
    ///
    /// Returns `false` for an invalid signature, a mismatched key, or key
    /// bytes that are not a valid curve point. We intentionally don't
    /// distinguish the cases — giving callers (or attackers) a detailed
    /// failure oracle buys nothing.
    pub fn verify(&self, message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        key.verify(message, &Signature::from_bytes(signature)).is_ok()
    }

    /// Borrow the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Copy the raw key bytes out.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.bytes
    }
}

// ---------------------------------------------------------------------------
// SecretKey
// ---------------------------------------------------------------------------

/// An Ed25519 signing key — the crown jewel. Guard it accordingly.
///
/// Does not implement `Serialize`, `Clone`-into-logs, or `Display`.
/// Serializing private key material should be a deliberate, conscious act
/// via [`to_bytes`](Self::to_bytes), not something that happens because a
/// keypair fell into a JSON response.
pub struct SecretKey {
    signing_key: SigningKey,
}

impl SecretKey {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    ///
    /// `OsRng` pulls from `/dev/urandom` on Unix. If that is compromised,
    /// UMI keys are the least of your worries.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Construct a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Construct a keypair from the 64-byte wire layout (seed || public key).
    ///
    /// The embedded public key must match the one derived from the seed —
    /// a mismatch means the bytes are corrupt or, worse, malicious.
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Result<Self, KeyError> {
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self { signing_key })
    }

    /// Derive the public half of this keypair.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message, producing a 64-byte Ed25519 signature.
    ///
    /// Deterministic — same key, same message, same signature (RFC 8032).
    /// No nonce reuse bugs possible. Thank you, Bernstein.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Export the 64-byte wire layout (seed || public key).
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The one thing this impl must never do is print key bytes.
        write!(f, "SecretKey(..)")
    }
}
