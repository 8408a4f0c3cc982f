//! # Block Records
//!
//! A UMI block is a fixed 167-byte header followed by a contiguous tail of
//! 150-byte transaction records:
//!
//! ```text
//! ┌─────────────────────┬─────────┐
//! │ field               │ offset  │
//! ├─────────────────────┼─────────┤
//! │ version: u8         │ 0       │
//! │ previous_block_hash │ 1..33   │
//! │ merkle_root         │ 33..65  │
//! │ timestamp: u32 BE   │ 65..69  │
//! │ tx_count: u16 BE    │ 69..71  │
//! │ publisher key       │ 71..103 │
//! │ signature           │ 103..167│
//! ├─────────────────────┼─────────┤
//! │ tx[0]               │ 167..317│
//! │ tx[1]               │ 317..467│
//! │ ...                 │         │
//! └─────────────────────┴─────────┘
//! ```
//!
//! The block hash and the block signature cover the *header only* (hash:
//! bytes 0..167; signature: bytes 0..103). Transaction integrity rides
//! along transitively through the `merkle_root` field — that is the entire
//! point of the Merkle accumulator.
//!
//! `tx_count` is maintained by [`append_transaction`](Block::append_transaction)
//! and is the single source of truth for how many records follow the
//! header; [`from_bytes`](Block::from_bytes) refuses buffers where the
//! count and the byte length disagree.

use std::ops::Range;

use thiserror::Error;

use crate::config::{
    BLOCK_HEADER_LENGTH, MAX_BLOCK_TRANSACTIONS, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH,
    TRANSACTION_LENGTH,
};
use crate::crypto::{sha256, PublicKey, SecretKey};
use crate::transaction::Transaction;

const PREVIOUS_HASH_RANGE: Range<usize> = 1..33;
const MERKLE_ROOT_RANGE: Range<usize> = 33..65;
const TIMESTAMP_RANGE: Range<usize> = 65..69;
const TX_COUNT_RANGE: Range<usize> = 69..71;
const PUBLIC_KEY_RANGE: Range<usize> = 71..103;
const SIGNATURE_RANGE: Range<usize> = 103..167;
const SIGNED_RANGE: Range<usize> = 0..103;

/// Buffer- and index-contract failures for block records.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BlockError {
    /// The raw buffer is shorter than a header.
    #[error("invalid block length: expected at least {expected} bytes, got {got}")]
    TooShort {
        /// Minimum number of bytes (one header).
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// The buffer length disagrees with the header's transaction count.
    #[error("inconsistent block length: tx_count {tx_count} implies {expected} bytes, got {got}")]
    InconsistentLength {
        /// The header's transaction count.
        tx_count: u16,
        /// `167 + 150 * tx_count`.
        expected: usize,
        /// Actual number of bytes.
        got: usize,
    },

    /// A transaction index at or past `tx_count`.
    #[error("transaction index {index} out of bounds: block holds {tx_count}")]
    IndexOutOfBounds {
        /// The requested index.
        index: u16,
        /// The block's transaction count.
        tx_count: u16,
    },

    /// The block already holds 65535 transactions — the u16 ceiling.
    #[error("block is full: transaction count is at the u16 maximum")]
    TooManyTransactions,
}

/// A block record: 167-byte header plus its transaction tail.
///
/// Unlike [`Address`](crate::address::Address) and [`Transaction`], a block
/// grows as transactions are appended, so the buffer lives on the heap.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    bytes: Vec<u8>,
}

impl Block {
    /// The fixed byte length of a block header.
    pub const HEADER_LENGTH: usize = BLOCK_HEADER_LENGTH;

    /// Create an empty block: header only, version 1, zero transactions.
    pub fn new() -> Self {
        let mut block = Self {
            bytes: vec![0; BLOCK_HEADER_LENGTH],
        };
        block.bytes[0] = 1;
        block
    }

    /// Copy a block from raw bytes, header and transaction tail included.
    ///
    /// The buffer must be at least one header long, and its total length
    /// must equal `167 + 150 * tx_count` — a buffer whose count and length
    /// disagree is corrupt and gets rejected up front rather than producing
    /// out-of-range reads later.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, BlockError> {
        if bytes.len() < BLOCK_HEADER_LENGTH {
            return Err(BlockError::TooShort {
                expected: BLOCK_HEADER_LENGTH,
                got: bytes.len(),
            });
        }

        let tx_count = u16::from_be_bytes([bytes[69], bytes[70]]);
        let expected = BLOCK_HEADER_LENGTH + TRANSACTION_LENGTH * usize::from(tx_count);
        if bytes.len() != expected {
            return Err(BlockError::InconsistentLength {
                tx_count,
                expected,
                got: bytes.len(),
            });
        }

        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// The version byte at offset 0.
    pub fn version(&self) -> u8 {
        self.bytes[0]
    }

    /// Set the version byte.
    pub fn set_version(&mut self, version: u8) -> &mut Self {
        self.bytes[0] = version;
        self
    }

    /// The previous block's header hash, bytes 1..33.
    pub fn previous_block_hash(&self) -> [u8; 32] {
        self.read_hash(PREVIOUS_HASH_RANGE)
    }

    /// Set the previous block hash.
    pub fn set_previous_block_hash(&mut self, hash: &[u8; 32]) -> &mut Self {
        self.bytes[PREVIOUS_HASH_RANGE].copy_from_slice(hash);
        self
    }

    /// The Merkle root over this block's transactions, bytes 33..65.
    pub fn merkle_root(&self) -> [u8; 32] {
        self.read_hash(MERKLE_ROOT_RANGE)
    }

    /// Set the Merkle root.
    pub fn set_merkle_root(&mut self, root: &[u8; 32]) -> &mut Self {
        self.bytes[MERKLE_ROOT_RANGE].copy_from_slice(root);
        self
    }

    /// The publication timestamp (Unix seconds), bytes 65..69.
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes(
            self.bytes[TIMESTAMP_RANGE]
                .try_into()
                .expect("range is 4 bytes"),
        )
    }

    /// Set the publication timestamp.
    pub fn set_timestamp(&mut self, timestamp: u32) -> &mut Self {
        self.bytes[TIMESTAMP_RANGE].copy_from_slice(&timestamp.to_be_bytes());
        self
    }

    /// The number of transaction records following the header.
    pub fn tx_count(&self) -> u16 {
        u16::from_be_bytes([self.bytes[69], self.bytes[70]])
    }

    fn set_tx_count(&mut self, count: u16) {
        self.bytes[TX_COUNT_RANGE].copy_from_slice(&count.to_be_bytes());
    }

    /// The publisher's public key, bytes 71..103. Written by
    /// [`sign`](Self::sign).
    pub fn public_key(&self) -> PublicKey {
        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(&self.bytes[PUBLIC_KEY_RANGE]);
        PublicKey::from_bytes(key)
    }

    /// The header signature, bytes 103..167.
    pub fn signature(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut sig = [0u8; SIGNATURE_LENGTH];
        sig.copy_from_slice(&self.bytes[SIGNATURE_RANGE]);
        sig
    }

    /// Sign the block: the signer's public key goes into bytes 71..103,
    /// then the signature over bytes 0..103 goes into bytes 103..167.
    ///
    /// Sign *after* setting the Merkle root and timestamp — any later
    /// header mutation invalidates the signature.
    pub fn sign(&mut self, key: &SecretKey) -> &mut Self {
        self.bytes[PUBLIC_KEY_RANGE].copy_from_slice(key.public_key().as_bytes());
        let signature = key.sign(&self.bytes[SIGNED_RANGE]);
        self.bytes[SIGNATURE_RANGE].copy_from_slice(&signature);
        self
    }

    /// Verify the header signature against the embedded publisher key.
    pub fn verify(&self) -> bool {
        let signature = self.signature();
        self.public_key()
            .verify(&self.bytes[SIGNED_RANGE], &signature)
    }

    /// SHA-256 over the 167 header bytes only. Appending transactions does
    /// not change the hash; updating the Merkle root does.
    pub fn hash(&self) -> [u8; 32] {
        sha256(&self.bytes[..BLOCK_HEADER_LENGTH])
    }

    /// Append a transaction record to the tail and bump `tx_count`.
    ///
    /// Fails once the count reaches the u16 ceiling; that is a wire-format
    /// limit, not something a bigger buffer could fix.
    pub fn append_transaction(&mut self, tx: &Transaction) -> Result<&mut Self, BlockError> {
        let count = self.tx_count();
        if usize::from(count) >= MAX_BLOCK_TRANSACTIONS {
            return Err(BlockError::TooManyTransactions);
        }

        self.set_tx_count(count + 1);
        self.bytes.extend_from_slice(tx.as_bytes());
        Ok(self)
    }

    /// Extract the transaction at `index` as a value copy.
    ///
    /// `index >= tx_count` is rejected; it would otherwise read past the
    /// buffer.
    pub fn transaction(&self, index: u16) -> Result<Transaction, BlockError> {
        Ok(Transaction::from_bytes(self.transaction_bytes(index)?)
            .expect("transaction slice is 150 bytes"))
    }

    /// Borrow the raw 150 bytes of the transaction at `index`.
    ///
    /// The Merkle builder hashes straight out of the block buffer through
    /// this view; everyone else probably wants [`transaction`](Self::transaction).
    pub fn transaction_bytes(&self, index: u16) -> Result<&[u8], BlockError> {
        let tx_count = self.tx_count();
        if index >= tx_count {
            return Err(BlockError::IndexOutOfBounds { index, tx_count });
        }

        let offset = BLOCK_HEADER_LENGTH + TRANSACTION_LENGTH * usize::from(index);
        Ok(&self.bytes[offset..offset + TRANSACTION_LENGTH])
    }

    /// Copy the full buffer out, header and transaction tail.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    /// Borrow the full buffer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn read_hash(&self, range: Range<usize>) -> [u8; 32] {
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&self.bytes[range]);
        hash
    }
}

impl Default for Block {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("version", &self.version())
            .field("tx_count", &self.tx_count())
            .field("hash", &hex::encode(self.hash()))
            .finish()
    }
}
