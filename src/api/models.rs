use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, RwLock};

use crate::blockchain::{Block, ChainValidator, Ledger, ProofOfWork};
use crate::config::NodeConfig;
use crate::error::LedgerError;
use crate::network::{ConsensusReconciler, HttpChainFetcher, Node, PeerRegistry};
use crate::transaction::Transaction;

/// Shared application state: one ledger and one peer registry per process.
pub struct AppState {
    pub ledger: RwLock<Ledger>,
    pub peers: Mutex<PeerRegistry>,
    pub validator: ChainValidator,
    pub reconciler: ConsensusReconciler,
    pub fetcher: HttpChainFetcher,
    pub node_address: String,
    pub miner_receiver: String,
    pub mining_reward: u64,
    /// Raised on shutdown; aborts any proof search in flight.
    pub shutdown: Arc<AtomicBool>,
}

impl AppState {
    /// Node state at the fixed production difficulty.
    pub fn new(config: &NodeConfig) -> Result<Self, LedgerError> {
        Self::with_pow(config, ProofOfWork::default())
    }

    pub(crate) fn with_pow(config: &NodeConfig, pow: ProofOfWork) -> Result<Self, LedgerError> {
        let validator = ChainValidator::new(pow);
        Ok(Self {
            ledger: RwLock::new(Ledger::with_pow(pow)),
            peers: Mutex::new(PeerRegistry::new()),
            validator,
            reconciler: ConsensusReconciler::new(validator),
            fetcher: HttpChainFetcher::new(config.peer_timeout)?,
            node_address: config.node_address.clone(),
            miner_receiver: config.miner_receiver.clone(),
            mining_reward: config.mining_reward,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    fn reward(&self) -> Option<Transaction> {
        (self.mining_reward > 0).then(|| {
            Transaction::new(
                self.node_address.clone(),
                self.miner_receiver.clone(),
                self.mining_reward,
            )
        })
    }

    /// Mine the next block under the ledger's write lock, so mining,
    /// submissions and chain replacement never interleave.
    pub fn mine(&self) -> Result<Block, LedgerError> {
        let mut ledger = self.ledger.write().expect("ledger lock poisoned");
        let block = ledger.mine(self.reward(), &self.shutdown)?;
        Ok(block.clone())
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
    pub pending: Vec<Transaction>,
    pub nodes: Vec<Node>,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: &'static str,
    pub block: Block,
}

/* ---------- TX API Models ---------- */

#[derive(Serialize)]
pub struct NewTxResponse {
    pub message: String,
    pub index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node API Models ---------- */

#[derive(Deserialize)]
pub struct ConnectRequest {
    pub nodes: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub message: &'static str,
    pub total_nodes: Vec<Node>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: &'static str,
    pub replaced: bool,
    pub length: usize,
    pub chain: Vec<Block>,
}
