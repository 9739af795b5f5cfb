use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};

use super::DEFAULT_DIFFICULTY;

/// Fixed-difficulty puzzle: find the smallest `proof >= 1` such that
/// `sha256(proof² - previous_proof²)` starts with `difficulty` hex zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
        }
    }
}

impl ProofOfWork {
    /// Lowered difficulty for fixtures; nodes always run at the default.
    #[cfg(test)]
    pub const fn new(difficulty: usize) -> Self {
        assert!(difficulty >= 1 && difficulty <= 64);
        Self { difficulty }
    }

    /// Search upward from 1 until a winning proof is found. Runs until solved
    /// unless `cancel` is raised, which is the only way to get `None`.
    pub fn solve(&self, previous_proof: i64, cancel: &AtomicBool) -> Option<i64> {
        let mut candidate = 1;
        loop {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            if self.is_valid(candidate, previous_proof) {
                return Some(candidate);
            }
            candidate += 1;
        }
    }

    pub fn is_valid(&self, candidate: i64, previous_proof: i64) -> bool {
        puzzle_digest(candidate, previous_proof)
            .bytes()
            .take(self.difficulty)
            .all(|c| c == b'0')
    }
}

/// Hex digest of the decimal rendering of `candidate² - previous_proof²`.
/// i64 squares always fit in i128, and so does their difference.
pub fn puzzle_digest(candidate: i64, previous_proof: i64) -> String {
    let candidate = candidate as i128;
    let previous = previous_proof as i128;
    let operand = candidate * candidate - previous * previous;

    let mut hasher = Sha256::new();
    hasher.update(operand.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
