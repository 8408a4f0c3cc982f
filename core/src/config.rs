//! # Wire-Format Constants
//!
//! Every magic number in the UMI wire format lives here. If you're hardcoding
//! a length or a version somewhere else, you're doing it wrong and you owe
//! the team coffee.
//!
//! These values are consensus-critical. They were fixed when the network
//! launched and changing any of them is not a refactor, it's a hard fork.

// ---------------------------------------------------------------------------
// Record Sizes
// ---------------------------------------------------------------------------

/// An address is always exactly 34 bytes: a big-endian u16 version followed
/// by a 32-byte Ed25519 public key.
pub const ADDRESS_LENGTH: usize = 34;

/// A transaction is always exactly 150 bytes. 85 bytes of signed body,
/// 64 bytes of signature, and one reserved trailing byte.
pub const TRANSACTION_LENGTH: usize = 150;

/// A block header is always exactly 167 bytes. Transactions follow the
/// header as a contiguous run of 150-byte records.
pub const BLOCK_HEADER_LENGTH: usize = 167;

/// The most transactions a single block can carry. The count is stored as a
/// u16 in the header, so this is a hard wire-format ceiling, not a policy.
pub const MAX_BLOCK_TRANSACTIONS: usize = u16::MAX as usize;

// ---------------------------------------------------------------------------
// Address Versions
// ---------------------------------------------------------------------------

/// The reserved genesis version. Displays as the prefix `"genesis"` rather
/// than a 3-letter code.
pub const VERSION_GENESIS: u16 = 0;

/// The mainnet version, 21929 — the 15-bit packing of the prefix `"umi"`.
pub const VERSION_UMI: u16 = 21929;

/// Human-readable prefix for mainnet addresses.
pub const PREFIX_UMI: &str = "umi";

/// Human-readable prefix for the genesis address version.
pub const PREFIX_GENESIS: &str = "genesis";

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 public key length. 32 bytes, always.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 secret key length in its expanded form: 32-byte seed followed by
/// the 32-byte public key. This matches the layout every other UMI
/// implementation uses for key storage.
pub const SECRET_KEY_LENGTH: usize = 64;

/// Ed25519 seed length.
pub const SEED_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something has
/// gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

/// SHA-256 digest length.
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Bech32
// ---------------------------------------------------------------------------

/// Maximum total length of an encoded Bech32 string, separator and checksum
/// included.
pub const BECH32_MAX_LENGTH: usize = 90;

/// Length of the Bech32 checksum in data-part symbols.
pub const BECH32_CHECKSUM_LENGTH: usize = 6;

// ---------------------------------------------------------------------------
// Validation Bounds
// ---------------------------------------------------------------------------

/// Upper bound on the value of a basic transaction. Yes, it is 2^53 - 1, and
/// yes, that is a JavaScript `Number.MAX_SAFE_INTEGER`-shaped limit. It is
/// part of the consensus rules exactly as written; do not round it to
/// something prettier.
pub const MAX_BASIC_VALUE: u64 = 9_007_199_254_740_991;

/// Inclusive lower bound for a smart-contract profit percentage (1.00%).
pub const MIN_PROFIT_PERCENT: u16 = 100;

/// Inclusive upper bound for a smart-contract profit percentage (5.00%).
pub const MAX_PROFIT_PERCENT: u16 = 500;

/// Inclusive upper bound for a smart-contract fee percentage (20.00%).
pub const MAX_FEE_PERCENT: u16 = 2000;
