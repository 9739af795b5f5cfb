use log::debug;
use std::sync::atomic::AtomicBool;

use super::{Block, ProofOfWork};
use crate::error::LedgerError;
use crate::transaction::{Transaction, TransactionDraft};

/// In-memory ledger: the committed chain plus the pool of transactions
/// waiting for the next block.
#[derive(Debug)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
    pow: ProofOfWork,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block at production difficulty.
    pub fn new() -> Self {
        Self::with_pow(ProofOfWork::default())
    }

    pub fn with_pow(pow: ProofOfWork) -> Self {
        Self {
            chain: vec![Block::genesis()],
            pending: Vec::new(),
            pow,
        }
    }

    pub fn pow(&self) -> ProofOfWork {
        self.pow
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("ledger always holds at least the genesis block")
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Owned copy of the committed chain; callers cannot reach the original.
    pub fn chain_snapshot(&self) -> Vec<Block> {
        self.chain.clone()
    }

    /// Append the next block, moving every pending transaction into it.
    pub fn create_block(&mut self, proof: i64, previous_hash: String) -> &Block {
        let index = self.chain.len() as u64 + 1;
        let transactions = std::mem::take(&mut self.pending);
        debug!(
            "LEDGER - block #{} settles {} pending txs",
            index,
            transactions.len()
        );
        self.chain
            .push(Block::new(index, proof, previous_hash, transactions));
        self.last_block()
    }

    /// Solve the puzzle against the last block and append the result.
    /// `reward`, if any, is queued once the proof is found so it settles last.
    /// A raised `cancel` leaves the chain and pool untouched.
    pub fn mine(
        &mut self,
        reward: Option<Transaction>,
        cancel: &AtomicBool,
    ) -> Result<&Block, LedgerError> {
        let last = self.last_block();
        let previous_hash = last.content_hash();
        let proof = self
            .pow
            .solve(last.proof, cancel)
            .ok_or(LedgerError::MiningCancelled)?;
        if let Some(reward) = reward {
            self.queue(reward);
        }
        Ok(self.create_block(proof, previous_hash))
    }

    /// Validate a submission and queue it. Returns the index of the block it
    /// will be settled in.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<u64, LedgerError> {
        let tx = Transaction::try_from(draft)?;
        Ok(self.queue(tx))
    }

    /// Queue an already well-formed transaction.
    pub fn queue(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.last_block().index + 1
    }

    /// Swap in `candidate` when it is strictly longer than the current chain.
    /// The caller is responsible for having validated it.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() <= self.chain.len() {
            return false;
        }
        self.chain = candidate;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::ChainValidator;

    fn fixture() -> Ledger {
        Ledger::with_pow(ProofOfWork::new(2))
    }

    fn mine(ledger: &mut Ledger) -> Block {
        ledger.mine(None, &AtomicBool::new(false)).unwrap().clone()
    }

    fn draft(sender: &str, receiver: &str, amount: u64) -> TransactionDraft {
        TransactionDraft {
            sender: Some(sender.into()),
            receiver: Some(receiver.into()),
            amount: Some(amount.into()),
        }
    }

    #[test]
    fn starts_with_genesis_only() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        let genesis = ledger.last_block();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, "0");
        assert_eq!(genesis.proof, 1);
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn mined_block_links_to_previous() {
        let mut ledger = fixture();
        let prior_hash = ledger.last_block().content_hash();
        let block = mine(&mut ledger);
        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, prior_hash);
        assert_eq!(block.proof, 308);
        assert!(ChainValidator::new(ledger.pow()).is_valid(&ledger.chain_snapshot()));
    }

    #[test]
    fn mining_drains_the_pool_in_order() {
        let mut ledger = fixture();
        assert_eq!(ledger.add_transaction(draft("a", "b", 1)).unwrap(), 2);
        assert_eq!(ledger.add_transaction(draft("b", "c", 2)).unwrap(), 2);
        assert_eq!(ledger.add_transaction(draft("c", "a", 3)).unwrap(), 2);

        let block = mine(&mut ledger);
        assert_eq!(
            block.transactions,
            vec![
                Transaction::new("a", "b", 1),
                Transaction::new("b", "c", 2),
                Transaction::new("c", "a", 3),
            ]
        );
        assert!(ledger.pending().is_empty());

        // Next submission targets the following block.
        assert_eq!(ledger.add_transaction(draft("a", "c", 4)).unwrap(), 3);
    }

    #[test]
    fn malformed_submission_leaves_pool_untouched() {
        let mut ledger = fixture();
        let err = ledger
            .add_transaction(TransactionDraft {
                sender: Some("a".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, LedgerError::MalformedTransaction("receiver")));
        assert!(ledger.pending().is_empty());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn create_block_allocates_sequential_indices() {
        let mut ledger = fixture();
        ledger.create_block(7, "x".into());
        ledger.create_block(8, "y".into());
        let indices: Vec<u64> = ledger.chain_snapshot().iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn snapshot_does_not_alias_the_chain() {
        let ledger = fixture();
        let mut snapshot = ledger.chain_snapshot();
        snapshot[0].proof = 99;
        snapshot.clear();
        assert_eq!(ledger.last_block().proof, 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn reward_settles_after_pending_transactions() {
        let mut ledger = fixture();
        ledger.queue(Transaction::new("a", "b", 1));
        let block = ledger
            .mine(
                Some(Transaction::new("node", "miner", 10)),
                &AtomicBool::new(false),
            )
            .unwrap()
            .clone();
        assert_eq!(
            block.transactions,
            vec![
                Transaction::new("a", "b", 1),
                Transaction::new("node", "miner", 10),
            ]
        );
    }

    #[test]
    fn cancelled_mining_changes_nothing() {
        let mut ledger = fixture();
        ledger.queue(Transaction::new("a", "b", 1));
        let outcome = ledger.mine(
            Some(Transaction::new("node", "miner", 10)),
            &AtomicBool::new(true),
        );
        assert!(matches!(outcome, Err(LedgerError::MiningCancelled)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.pending(), &[Transaction::new("a", "b", 1)]);
    }

    #[test]
    fn replacement_requires_strictly_longer_chain() {
        let mut ledger = fixture();
        let mut other = fixture();
        mine(&mut other);

        assert!(!ledger.replace_chain(vec![Block::genesis()]));
        assert!(ledger.replace_chain(other.chain_snapshot()));
        assert_eq!(ledger.len(), 2);
    }
}
