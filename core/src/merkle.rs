//! # Merkle Root Builder
//!
//! Binds a block's transaction list to the single 32-byte digest stored in
//! the block header. Leaves are SHA-256 hashes of the raw 150-byte
//! transaction records; interior nodes are SHA-256 of `left || right`.
//!
//! ## The odd-count rule
//!
//! When a reduction level holds an odd number of nodes (and more than two),
//! the last node is paired with *itself* — not with a zero digest. This is
//! the rule every other UMI implementation uses, and a padding scheme that
//! differs here produces a different root for the same transactions, which
//! is a consensus failure. The fixture tests pin this down.
//!
//! ## Scratch buffers
//!
//! Block processing can run at high frequency, and allocating a 65535-slot
//! hash array per call would make the allocator the hot path. Builders
//! instead check a scratch buffer out of a shared [`ScratchPool`], use it
//! exclusively, and return it when the call ends — including on early
//! error returns, courtesy of RAII. The pool is an explicit, injectable
//! object rather than a process global, so tests can own their pools and
//! assert on reuse.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, trace};

use crate::block::{Block, BlockError};
use crate::config::MAX_BLOCK_TRANSACTIONS;
use crate::crypto::{sha256, sha256_multi};

/// Errors from Merkle root computation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MerkleError {
    /// The block holds no transactions, so there is nothing to bind. The
    /// wire format has no defined root for an empty list; callers decide
    /// what an empty block means, not this module.
    #[error("cannot compute a merkle root over zero transactions")]
    EmptyBlock,

    /// The block buffer failed an index contract mid-walk. With a
    /// consistent block this cannot happen.
    #[error("block error: {0}")]
    Block(#[from] BlockError),
}

// ---------------------------------------------------------------------------
// ScratchPool
// ---------------------------------------------------------------------------

/// A thread-safe pool of 65535-slot hash arrays (2 MiB each).
///
/// Checkout pops a free buffer or allocates a fresh one if the pool is
/// empty, so the pool grows to the peak number of concurrent computations
/// and then stops allocating. A checked-out buffer has exactly one owner
/// until its guard drops.
pub struct ScratchPool {
    free: Mutex<Vec<Box<[[u8; 32]]>>>,
}

impl ScratchPool {
    /// Create an empty pool. Buffers are allocated lazily on first use.
    pub fn new() -> Self {
        Self {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Number of buffers currently sitting free in the pool.
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    fn checkout(&self) -> ScratchGuard<'_> {
        let buffer = self.free.lock().pop().unwrap_or_else(|| {
            trace!("scratch pool empty, allocating a new buffer");
            vec![[0u8; 32]; MAX_BLOCK_TRANSACTIONS].into_boxed_slice()
        });
        ScratchGuard {
            pool: self,
            buffer: Some(buffer),
        }
    }
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive ownership of one scratch buffer; returns it to the pool on
/// drop, whatever path the computation took.
struct ScratchGuard<'a> {
    pool: &'a ScratchPool,
    buffer: Option<Box<[[u8; 32]]>>,
}

impl Deref for ScratchGuard<'_> {
    type Target = [[u8; 32]];

    fn deref(&self) -> &Self::Target {
        self.buffer.as_ref().expect("buffer present until drop")
    }
}

impl DerefMut for ScratchGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buffer.as_mut().expect("buffer present until drop")
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.free.lock().push(buffer);
        }
    }
}

// ---------------------------------------------------------------------------
// MerkleBuilder
// ---------------------------------------------------------------------------

/// Computes Merkle roots for blocks, drawing scratch space from a shared
/// pool.
///
/// Builders are cheap handles; clone one per thread and let them share the
/// pool.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use umi_core::{Block, MerkleBuilder, ScratchPool, Transaction};
///
/// let builder = MerkleBuilder::new(Arc::new(ScratchPool::new()));
/// let mut block = Block::new();
/// block.append_transaction(&Transaction::new()).unwrap();
///
/// let root = builder.root(&block).unwrap();
/// block.set_merkle_root(&root);
/// ```
#[derive(Clone)]
pub struct MerkleBuilder {
    pool: Arc<ScratchPool>,
}

impl MerkleBuilder {
    /// Create a builder drawing scratch buffers from `pool`.
    pub fn new(pool: Arc<ScratchPool>) -> Self {
        Self { pool }
    }

    /// The pool this builder draws from.
    pub fn pool(&self) -> &Arc<ScratchPool> {
        &self.pool
    }

    /// Compute the Merkle root over the block's transactions.
    ///
    /// A single transaction is its own root (no pairing step). Zero
    /// transactions is an error — see [`MerkleError::EmptyBlock`].
    pub fn root(&self, block: &Block) -> Result<[u8; 32], MerkleError> {
        let tx_count = block.tx_count();
        if tx_count == 0 {
            return Err(MerkleError::EmptyBlock);
        }

        debug!(tx_count, "computing merkle root");
        let mut slots = self.pool.checkout();

        // Leaf pass: hash every raw transaction record.
        for index in 0..tx_count {
            slots[usize::from(index)] = sha256(block.transaction_bytes(index)?);
        }

        // Reduction passes. At each level with an odd count above two, the
        // last node partners itself.
        let mut count = usize::from(tx_count);
        while count > 1 {
            let last = count - 1;
            let pairs = if count > 2 { (count + count % 2) / 2 } else { 1 };

            for i in 0..pairs {
                let left = i * 2;
                let right = (left + 1).min(last);
                slots[i] = sha256_multi(&[&slots[left], &slots[right]]);
            }

            count = pairs;
        }

        Ok(slots[0])
    }
}

impl Default for MerkleBuilder {
    /// A builder with its own private pool. Fine for one-off use; share a
    /// pool explicitly when several builders run side by side.
    fn default() -> Self {
        Self::new(Arc::new(ScratchPool::new()))
    }
}
