//! Block and chain validation
//!
//! Pure functions for validating a candidate against the chain tail and for
//! auditing an existing chain.

use crate::consensus::Block;
use crate::crypto::Hash;
use thiserror::Error;

/// Why a candidate block was refused by `validate_block`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("previous hash {found} does not match tail hash {expected}")]
    LinkageMismatch { expected: Hash, found: Hash },
    #[error("position {found} does not directly follow tail position {tail}")]
    SequenceGap { tail: u64, found: u64 },
    #[error("stored hash {stored} does not match recomputed hash {computed}")]
    SelfHashMismatch { stored: Hash, computed: Hash },
    #[error("only block 0 may carry a genesis payload")]
    GenesisPayload,
}

/// A defect found while auditing a committed chain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error("chain is empty")]
    Empty,
    #[error("genesis block is malformed: {0}")]
    MalformedGenesis(&'static str),
    #[error("block at index {index} is corrupt: {reason}")]
    BrokenBlock { index: usize, reason: RejectReason },
}

/// Check the hash seal of a single block
pub fn validate_self_hash(block: &Block) -> Result<(), RejectReason> {
    let computed = block.recompute_hash();
    if computed != block.hash {
        return Err(RejectReason::SelfHashMismatch {
            stored: block.hash,
            computed,
        });
    }
    Ok(())
}

/// Validate a candidate block against the current tail.
///
/// The position is checked before linkage so that a candidate built on a
/// stale tail is reported as a sequence gap.
pub fn validate_block(candidate: &Block, tail: &Block) -> Result<(), RejectReason> {
    // Nothing can follow a tail at u64::MAX.
    if tail.position.checked_add(1) != Some(candidate.position) {
        return Err(RejectReason::SequenceGap {
            tail: tail.position,
            found: candidate.position,
        });
    }

    if candidate.previous_hash != tail.hash {
        return Err(RejectReason::LinkageMismatch {
            expected: tail.hash,
            found: candidate.previous_hash,
        });
    }

    validate_self_hash(candidate)?;

    if candidate.payload.is_genesis {
        return Err(RejectReason::GenesisPayload);
    }
    Ok(())
}

/// Validate the genesis block in isolation
pub fn validate_genesis(genesis: &Block) -> Result<(), IntegrityViolation> {
    if genesis.position != 0 {
        return Err(IntegrityViolation::MalformedGenesis("position is not 0"));
    }
    if !genesis.previous_hash.is_zero() {
        return Err(IntegrityViolation::MalformedGenesis("previous hash is not the zero sentinel"));
    }
    if !genesis.payload.is_genesis {
        return Err(IntegrityViolation::MalformedGenesis("payload is not flagged as genesis"));
    }
    validate_self_hash(genesis)
        .map_err(|reason| IntegrityViolation::BrokenBlock { index: 0, reason })
}

/// Walk a whole chain from genesis and report the first defect
pub fn validate_chain(blocks: &[Block]) -> Result<(), IntegrityViolation> {
    let genesis = blocks.first().ok_or(IntegrityViolation::Empty)?;
    validate_genesis(genesis)?;

    for (index, pair) in blocks.windows(2).enumerate() {
        let (prev, block) = (&pair[0], &pair[1]);
        let index = index + 1;
        validate_block(block, prev)
            .map_err(|reason| IntegrityViolation::BrokenBlock { index, reason })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::{BlockFactory, Checkout, FixedClock};
    use std::sync::Arc;

    fn factory() -> BlockFactory {
        BlockFactory::new(Arc::new(FixedClock::new("2024-03-01T12:00:00Z")))
    }

    fn chain(len: usize) -> Vec<Block> {
        let f = factory();
        let mut blocks = vec![f.create_genesis()];
        for i in 1..len {
            let next = f.create_block(blocks.last(), Checkout::new(format!("b{i}"), "alice", "d"));
            blocks.push(next);
        }
        blocks
    }

    #[test]
    fn test_valid_candidate_accepted() {
        let blocks = chain(2);
        assert_eq!(validate_block(&blocks[1], &blocks[0]), Ok(()));
    }

    #[test]
    fn test_child_hash_differs_from_parent_hash() {
        let blocks = chain(2);
        assert_ne!(blocks[0].hash, blocks[1].hash);
        assert!(validate_block(&blocks[1], &blocks[0]).is_ok());
    }

    #[test]
    fn test_wrong_previous_hash_rejected() {
        let blocks = chain(2);
        let forged = Block::new(1, Checkout::new("b1", "eve", "d"), "t".into(), Hash::zero());

        assert!(matches!(
            validate_block(&forged, &blocks[0]),
            Err(RejectReason::LinkageMismatch { .. })
        ));
    }

    #[test]
    fn test_position_gap_rejected() {
        let blocks = chain(1);
        let skipped = Block::new(2, Checkout::new("b1", "eve", "d"), "t".into(), blocks[0].hash);

        assert_eq!(
            validate_block(&skipped, &blocks[0]),
            Err(RejectReason::SequenceGap { tail: 0, found: 2 })
        );
    }

    #[test]
    fn test_stale_candidate_reports_sequence_gap() {
        let blocks = chain(3);
        // Built on blocks[0] but submitted after blocks[1] was committed
        let stale = factory().create_block(Some(&blocks[0]), Checkout::new("x", "bob", "d"));

        assert!(matches!(
            validate_block(&stale, &blocks[1]),
            Err(RejectReason::SequenceGap { tail: 1, found: 1 })
        ));
    }

    #[test]
    fn test_tail_at_max_position_has_no_successor() {
        let tail = Block::new(u64::MAX, Checkout::new("b", "u", "d"), "t".into(), Hash::zero());
        for found in [0, u64::MAX] {
            let candidate = Block::new(found, Checkout::new("b", "u", "d"), "t".into(), tail.hash);
            assert_eq!(
                validate_block(&candidate, &tail),
                Err(RejectReason::SequenceGap { tail: u64::MAX, found })
            );
        }
    }

    #[test]
    fn test_tampered_candidate_rejected() {
        let blocks = chain(2);
        let mut tampered = blocks[1].clone();
        tampered.payload.book_id = "other".into();

        assert!(matches!(
            validate_block(&tampered, &blocks[0]),
            Err(RejectReason::SelfHashMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_chain_accepts_fresh_chain() {
        assert_eq!(validate_chain(&chain(5)), Ok(()));
    }

    #[test]
    fn test_validate_chain_rejects_empty() {
        assert_eq!(validate_chain(&[]), Err(IntegrityViolation::Empty));
    }

    #[test]
    fn test_validate_chain_detects_tampered_payload() {
        let mut blocks = chain(4);
        blocks[2].payload.user = "mallory".into();

        assert!(matches!(
            validate_chain(&blocks),
            Err(IntegrityViolation::BrokenBlock {
                index: 2,
                reason: RejectReason::SelfHashMismatch { .. }
            })
        ));
    }

    #[test]
    fn test_validate_chain_detects_tampered_genesis() {
        let mut blocks = chain(2);
        blocks[0].timestamp = "1970-01-01T00:00:00Z".into();

        assert!(matches!(
            validate_chain(&blocks),
            Err(IntegrityViolation::BrokenBlock { index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_chain_detects_resealed_block() {
        // Re-sealing a tampered block breaks the link to its child instead
        let mut blocks = chain(3);
        blocks[1].payload.user = "mallory".into();
        blocks[1].hash = blocks[1].recompute_hash();

        assert!(matches!(
            validate_chain(&blocks),
            Err(IntegrityViolation::BrokenBlock {
                index: 2,
                reason: RejectReason::LinkageMismatch { .. }
            })
        ));
    }

    #[test]
    fn test_validate_chain_detects_second_genesis() {
        let mut blocks = chain(2);
        let f = factory();
        let fake = f.create_block(blocks.last(), Checkout::genesis());
        blocks.push(fake);

        assert_eq!(
            validate_chain(&blocks),
            Err(IntegrityViolation::BrokenBlock {
                index: 2,
                reason: RejectReason::GenesisPayload
            })
        );
    }

    #[test]
    fn test_validate_genesis_shape() {
        let f = factory();
        let not_genesis = f.create_block(None, Checkout::new("b", "u", "d"));
        assert!(matches!(
            validate_genesis(&not_genesis),
            Err(IntegrityViolation::MalformedGenesis(_))
        ));
    }
}
