//! Block construction
//!
//! The factory never rejects a payload; validation happens when a block is
//! submitted to the ledger. Reading the clock is the only side effect, and
//! the clock is injectable.

use std::sync::Arc;
use chrono::{SecondsFormat, Utc};
use crate::consensus::{Block, Checkout};
use crate::crypto::Hash;

/// Source of block timestamps
pub trait Clock: Send + Sync {
    /// Current time as an RFC 3339 string
    fn now(&self) -> String;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
    }
}

/// Clock that always reports the same instant
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl FixedClock {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self(timestamp.into())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> String {
        self.0.clone()
    }
}

/// Builds sealed blocks on top of a previous block
#[derive(Clone)]
pub struct BlockFactory {
    clock: Arc<dyn Clock>,
}

impl BlockFactory {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Build the block that follows `previous`.
    ///
    /// `None` stands for the synthetic block before genesis: the result lands
    /// at position 0 with the zero hash as its previous hash.
    pub fn create_block(&self, previous: Option<&Block>, payload: Checkout) -> Block {
        let (position, previous_hash) = match previous {
            // A wrapped position is caught by validation as a sequence gap.
            Some(prev) => (prev.position.wrapping_add(1), prev.hash),
            None => (0, Hash::zero()),
        };
        Block::new(position, payload, self.clock.now(), previous_hash)
    }

    /// Mint the genesis block
    pub fn create_genesis(&self) -> Block {
        self.create_block(None, Checkout::genesis())
    }
}

impl Default for BlockFactory {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl std::fmt::Debug for BlockFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockFactory").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: &str = "2024-03-01T12:00:00Z";

    fn factory() -> BlockFactory {
        BlockFactory::new(Arc::new(FixedClock::new(T0)))
    }

    #[test]
    fn test_genesis_shape() {
        let genesis = factory().create_genesis();
        assert_eq!(genesis.position, 0);
        assert_eq!(genesis.previous_hash, Hash::zero());
        assert!(genesis.payload.is_genesis);
        assert_eq!(genesis.timestamp, T0);
        assert!(genesis.is_sealed());
    }

    #[test]
    fn test_child_links_to_parent() {
        let f = factory();
        let genesis = f.create_genesis();
        let child = f.create_block(Some(&genesis), Checkout::new("b1", "alice", "2024-03-01"));

        assert_eq!(child.position, 1);
        assert_eq!(child.previous_hash, genesis.hash);
        assert!(!child.payload.is_genesis);
        assert!(child.is_sealed());
    }

    #[test]
    fn test_fixed_clock_makes_construction_deterministic() {
        let f = factory();
        let genesis = f.create_genesis();
        let a = f.create_block(Some(&genesis), Checkout::new("b1", "alice", "d"));
        let b = f.create_block(Some(&genesis), Checkout::new("b1", "alice", "d"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_child_of_max_position_is_rejected_not_panicking() {
        let f = factory();
        let tail = Block::new(u64::MAX, Checkout::default(), T0.into(), Hash::zero());
        let child = f.create_block(Some(&tail), Checkout::new("b1", "alice", "d"));

        assert_eq!(child.position, 0);
        assert!(crate::consensus::validate_block(&child, &tail).is_err());
    }

    #[test]
    fn test_system_clock_is_rfc3339() {
        let now = SystemClock.now();
        assert!(chrono::DateTime::parse_from_rfc3339(&now).is_ok());
    }
}
