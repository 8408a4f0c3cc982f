// Copyright (c) 2026 UMI. MIT License.
// See LICENSE for details.

//! # UMI Core — Ledger Format Library
//!
//! This is the layer of the UMI ledger that absolutely cannot be wrong: the
//! bit-exact wire layouts of addresses, transactions and blocks, the Bech32
//! address encoding, and the Merkle accumulator that binds a block's
//! transaction set to a single digest. Every other UMI implementation on the
//! planet must produce byte-identical output for these structures, or
//! signatures stop verifying and the network forks. No pressure.
//!
//! ## Architecture
//!
//! The crate is split into modules that mirror the actual record types on
//! the wire:
//!
//! - **config** — Every wire-format constant in one place.
//! - **crypto** — Thin wrappers over Ed25519 and SHA-256. Don't roll your own.
//! - **encoding** — The Bech32 codec and the 3-letter prefix codec.
//! - **address** — 34-byte address records (version + public key).
//! - **transaction** — 150-byte transaction records with per-version rules.
//! - **block** — 167-byte block headers plus their transaction tail.
//! - **merkle** — The Merkle root builder and its scratch-buffer pool.
//!
//! ## Design Philosophy
//!
//! 1. Records are fixed-size byte buffers with offset-exact accessors.
//!    The buffer *is* the wire format; there is no separate serializer to
//!    drift out of sync.
//! 2. Malformed input is a typed error, never a panic. Out-of-range indexes
//!    and wrong-length buffers are rejected loudly, not read past.
//! 3. Anything that looks like a magic number is preserved literally,
//!    because "fixing" it breaks cross-implementation compatibility.

pub mod address;
pub mod block;
pub mod config;
pub mod crypto;
pub mod encoding;
pub mod merkle;
pub mod transaction;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use address::{Address, AddressError};
pub use block::{Block, BlockError};
pub use crypto::{PublicKey, SecretKey};
pub use encoding::CodecError;
pub use merkle::{MerkleBuilder, MerkleError, ScratchPool};
pub use transaction::{Transaction, TransactionError, ValidationError, Version};
