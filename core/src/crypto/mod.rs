//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around the two primitives the UMI wire format
//! consumes: Ed25519 signatures and SHA-256 digests.
//!
//! This crate does not implement either algorithm — it delegates to
//! `ed25519-dalek` and `sha2` and treats them as opaque capabilities. The
//! wrappers exist so the rest of the codebase has one place to audit, one
//! set of error types, and no way to accidentally pass a signature where a
//! message goes.
//!
//! If you're tempted to optimize these functions, please reconsider. Then
//! reconsider again. Then go read about timing attacks and come back when
//! you've lost the urge.

pub mod hash;
pub mod keys;

pub use hash::{sha256, sha256_multi};
pub use keys::{KeyError, PublicKey, SecretKey};
