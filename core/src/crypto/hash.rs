//! # Hashing
//!
//! SHA-256, and only SHA-256. The UMI wire format fixed its hash function at
//! network launch, and every digest in the protocol — transaction hashes,
//! block hashes, Merkle nodes — is plain single-round SHA-256 over raw
//! record bytes. No domain separation, no double hashing, no personalization
//! strings. The format is what it is; interoperability beats elegance.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// Returns the 32-byte digest as a fixed-size array. This is the only hash
/// operation the wire format knows about, so it gets the short name.
///
/// # Example
///
/// ```
/// use umi_core::crypto::sha256;
///
/// let digest = sha256(b"");
/// assert_eq!(
///     hex::encode(digest),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Hash multiple byte slices together without concatenation overhead.
///
/// Instead of allocating a buffer to concatenate inputs, the parts are fed
/// sequentially into the hasher. Same result, less allocation. The Merkle
/// builder uses this to hash `left || right` node pairs on its hot path.
pub fn sha256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}
