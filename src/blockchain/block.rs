use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the ledger. Blocks never carry their own hash: the link to a
/// predecessor is recomputed from content whenever a chain is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix timestamp (UTC)
    pub proof: i64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self::new(
            1,
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
            Vec::new(),
        )
    }

    pub fn new(
        index: u64,
        proof: i64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp(),
            proof,
            previous_hash,
            transactions,
        }
    }

    /// SHA-256 over the block rendered as JSON with keys sorted, so two blocks
    /// with identical fields hash identically however they were built.
    pub fn content_hash(&self) -> String {
        // serde_json's Map is ordered by key unless `preserve_order` is enabled.
        let canonical = serde_json::to_value(self)
            .expect("serialize block")
            .to_string();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}
