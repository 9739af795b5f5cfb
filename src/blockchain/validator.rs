use super::{Block, ProofOfWork};
use crate::error::ChainError;

/// Walks a candidate chain checking backward links and proofs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainValidator {
    pow: ProofOfWork,
}

impl ChainValidator {
    pub fn new(pow: ProofOfWork) -> Self {
        Self { pow }
    }

    pub fn is_valid(&self, chain: &[Block]) -> bool {
        self.validate(chain).is_ok()
    }

    /// Stops at the first block whose `previous_hash` does not match the
    /// recomputed content-hash of its predecessor, or whose proof fails the
    /// puzzle against the predecessor's proof.
    pub fn validate(&self, chain: &[Block]) -> Result<(), ChainError> {
        if chain.is_empty() {
            return Err(ChainError::Empty);
        }

        for (index, pair) in chain.windows(2).enumerate() {
            let (previous, block) = (&pair[0], &pair[1]);
            let position = index + 1;

            if block.previous_hash != previous.content_hash() {
                return Err(ChainError::BrokenLink { index: position });
            }
            if !self.pow.is_valid(block.proof, previous.proof) {
                return Err(ChainError::InvalidProof { index: position });
            }
        }

        Ok(())
    }
}
