//! Block structure for the book ledger
//!
//! Defines the immutable block, its check-out payload, and the canonical
//! byte encoding the content hash is computed over.

use serde::{Deserialize, Serialize};
use crate::crypto::{hash_bytes, Hash};

/// A book check-out event carried by a block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkout {
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub user: String,
    #[serde(rename = "checkoutDate")]
    pub checkout_date: String,
    /// Only ever true for the payload of block 0
    pub is_genesis: bool,
}

impl Checkout {
    /// Create a regular (non-genesis) check-out event
    pub fn new(
        book_id: impl Into<String>,
        user: impl Into<String>,
        checkout_date: impl Into<String>,
    ) -> Self {
        Self {
            book_id: book_id.into(),
            user: user.into(),
            checkout_date: checkout_date.into(),
            is_genesis: false,
        }
    }

    /// The payload of the genesis block
    pub fn genesis() -> Self {
        Self {
            is_genesis: true,
            ..Self::default()
        }
    }

    /// Canonical payload serialization: compact JSON in declaration order
    /// `bookId, user, checkoutDate, is_genesis`.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("plain string/bool struct always serializes to JSON")
    }
}

/// One record of the chain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    /// Zero-based index in the chain
    pub position: u64,
    /// Check-out event carried by this block
    pub payload: Checkout,
    /// RFC 3339 creation time
    pub timestamp: String,
    /// Hash of the preceding block (zero for genesis)
    pub previous_hash: Hash,
    /// Content hash over the four fields above
    pub hash: Hash,
}

impl Block {
    /// Assemble a block and seal it with its content hash
    pub fn new(position: u64, payload: Checkout, timestamp: String, previous_hash: Hash) -> Self {
        let mut block = Self {
            position,
            payload,
            timestamp,
            previous_hash,
            hash: Hash::zero(),
        };
        block.hash = block.recompute_hash();
        block
    }

    /// Canonical byte encoding of the hashed fields.
    ///
    /// Each field is written as a big-endian `u64` length followed by its
    /// bytes: position as decimal text, timestamp, previous hash as hex text,
    /// then the canonical payload JSON.
    pub fn to_bytes(&self) -> Vec<u8> {
        let position = self.position.to_string();
        let previous = self.previous_hash.to_hex();
        let payload = self.payload.canonical_bytes();

        let mut bytes = Vec::with_capacity(
            32 + position.len() + self.timestamp.len() + previous.len() + payload.len(),
        );
        for field in [
            position.as_bytes(),
            self.timestamp.as_bytes(),
            previous.as_bytes(),
            payload.as_slice(),
        ] {
            // usize is at most 64 bits wide, so the prefix is lossless
            bytes.extend_from_slice(&(field.len() as u64).to_be_bytes());
            bytes.extend_from_slice(field);
        }
        bytes
    }

    /// Hash the block's content fields, ignoring the stored `hash`
    pub fn recompute_hash(&self) -> Hash {
        hash_bytes(&self.to_bytes())
    }

    /// Whether the stored hash still matches the content
    pub fn is_sealed(&self) -> bool {
        self.recompute_hash() == self.hash
    }
}
