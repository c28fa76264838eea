//! In-memory chain ledger
//!
//! Owns the ordered block sequence. Every mutation goes through `append` or
//! `submit`, both of which validate against the current tail while holding
//! the write lock, so readers never observe a half-committed block.

use std::sync::Arc;
use parking_lot::RwLock;
use crate::consensus::{
    validate_block, validate_chain, Block, BlockFactory, Checkout, Clock, IntegrityViolation,
    RejectReason, SystemClock,
};
use crate::crypto::Hash;

/// Append-only hash-chained ledger
#[derive(Debug)]
pub struct Ledger {
    factory: BlockFactory,
    blocks: RwLock<Vec<Block>>,
}

impl Ledger {
    /// Create a ledger holding only the genesis block
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a ledger whose blocks are stamped by `clock`
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let factory = BlockFactory::new(clock);
        let genesis = factory.create_genesis();
        tracing::debug!(hash = %genesis.hash, "genesis block created");

        Self {
            factory,
            blocks: RwLock::new(vec![genesis]),
        }
    }

    /// Build a block for `payload` on the current tail and commit it.
    ///
    /// The write lock is held from reading the tail until the commit, so
    /// concurrent appends are serialized and never race each other.
    pub fn append(&self, payload: Checkout) -> Result<Block, RejectReason> {
        let mut blocks = self.blocks.write();
        let tail = tail_of(&blocks);
        let candidate = self.factory.create_block(Some(tail), payload);
        commit(&mut blocks, candidate)
    }

    /// Commit a block that was built elsewhere, validating it against the
    /// tail at the time of the call.
    pub fn submit(&self, candidate: Block) -> Result<Block, RejectReason> {
        let mut blocks = self.blocks.write();
        commit(&mut blocks, candidate)
    }

    /// Owned copy of the whole chain, genesis first
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.read().clone()
    }

    /// Copy of the current last block
    pub fn tail(&self) -> Block {
        tail_of(&self.blocks.read()).clone()
    }

    /// Number of blocks, genesis included
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// Audit the whole chain and report the first defect found
    pub fn audit(&self) -> Result<(), IntegrityViolation> {
        let blocks = self.blocks.read();
        let result = validate_chain(&blocks);
        if let Err(ref violation) = result {
            tracing::error!(%violation, blocks = blocks.len(), "chain integrity violation");
        }
        result
    }

    /// Whether every block and every link in the chain checks out
    pub fn verify(&self) -> bool {
        self.audit().is_ok()
    }

    /// Get statistics about the chain
    pub fn stats(&self) -> ChainStats {
        let blocks = self.blocks.read();
        let tail = tail_of(&blocks);
        ChainStats {
            height: tail.position,
            tip_hash: tail.hash,
            block_count: blocks.len(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStats {
    pub height: u64,
    pub tip_hash: Hash,
    pub block_count: usize,
}

fn tail_of(blocks: &[Block]) -> &Block {
    // Constructed with genesis and never truncated.
    &blocks[blocks.len() - 1]
}

fn commit(blocks: &mut Vec<Block>, candidate: Block) -> Result<Block, RejectReason> {
    let tail = tail_of(blocks);
    if let Err(reason) = validate_block(&candidate, tail) {
        tracing::warn!(
            %reason,
            tail_position = tail.position,
            candidate_position = candidate.position,
            "block rejected"
        );
        return Err(reason);
    }

    tracing::info!(
        position = candidate.position,
        hash = %candidate.hash,
        book_id = %candidate.payload.book_id,
        "block appended"
    );
    blocks.push(candidate.clone());
    Ok(candidate)
}
