use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::RwLock;

use super::{ChainFetcher, Node, RemoteChain};
use crate::blockchain::{Block, ChainValidator, GENESIS_PREVIOUS_HASH, GENESIS_PROOF, Ledger};
use crate::error::ChainError;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub replaced: bool,
    pub chain: Vec<Block>,
}

/// Longest-valid-chain-wins reconciliation against known peers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsensusReconciler {
    validator: ChainValidator,
}

impl ConsensusReconciler {
    pub fn new(validator: ChainValidator) -> Self {
        Self { validator }
    }

    /// Ask every peer for its chain and keep the longest valid one that is
    /// strictly longer than `local_chain`. Unreachable peers and invalid
    /// candidates are skipped; ties never win.
    pub async fn reconcile<F: ChainFetcher>(
        &self,
        local_chain: Vec<Block>,
        peers: &[Node],
        fetcher: &F,
    ) -> Reconciliation {
        let responses = join_all(peers.iter().map(|node| async move {
            (node, fetcher.fetch_chain(node).await)
        }))
        .await;

        let mut best: Option<Vec<Block>> = None;
        let mut best_length = local_chain.len();

        for (node, response) in responses {
            let remote = match response {
                Ok(remote) => remote,
                Err(e) => {
                    warn!("CONSENSUS - skipping peer {}: {}", node.url, e);
                    continue;
                }
            };

            if remote.length <= best_length {
                debug!(
                    "CONSENSUS - peer {} offers length {} (best so far {})",
                    node.url, remote.length, best_length
                );
                continue;
            }

            match self.accept(remote) {
                Ok(chain) => {
                    info!(
                        "CONSENSUS - peer {} offers a valid chain of length {}",
                        node.url,
                        chain.len()
                    );
                    best_length = chain.len();
                    best = Some(chain);
                }
                Err(e) => warn!("CONSENSUS - discarding chain from {}: {}", node.url, e),
            }
        }

        match best {
            Some(chain) => Reconciliation {
                replaced: true,
                chain,
            },
            None => Reconciliation {
                replaced: false,
                chain: local_chain,
            },
        }
    }

    /// Run a pass against the ledger behind `ledger`. Peers are queried without
    /// holding the lock; the winning chain is installed only if it is still
    /// strictly longer than the ledger's chain at that moment.
    pub async fn reconcile_ledger<F: ChainFetcher>(
        &self,
        ledger: &RwLock<Ledger>,
        peers: &[Node],
        fetcher: &F,
    ) -> Reconciliation {
        let local_chain = ledger
            .read()
            .expect("ledger lock poisoned")
            .chain_snapshot();

        let outcome = self.reconcile(local_chain, peers, fetcher).await;

        let mut ledger = ledger.write().expect("ledger lock poisoned");
        let replaced = outcome.replaced && ledger.replace_chain(outcome.chain);
        if replaced {
            info!("CONSENSUS - chain replaced, new length {}", ledger.len());
        } else if outcome.replaced {
            info!("CONSENSUS - local chain grew past the candidate; keeping it");
        }

        Reconciliation {
            replaced,
            chain: ledger.chain_snapshot(),
        }
    }

    fn accept(&self, remote: RemoteChain) -> Result<Vec<Block>, ChainError> {
        if remote.length != remote.chain.len() {
            return Err(ChainError::LengthMismatch {
                reported: remote.length,
                actual: remote.chain.len(),
            });
        }
        check_structure(&remote.chain)?;
        self.validator.validate(&remote.chain)?;
        Ok(remote.chain)
    }
}

/// A chain this node can adopt must open with the genesis block and number
/// its blocks 1, 2, 3, ... in order.
fn check_structure(chain: &[Block]) -> Result<(), ChainError> {
    let genesis = chain.first().ok_or(ChainError::Empty)?;
    if genesis.index != 1
        || genesis.proof != GENESIS_PROOF
        || genesis.previous_hash != GENESIS_PREVIOUS_HASH
    {
        return Err(ChainError::BadGenesis);
    }

    for (position, block) in chain.iter().enumerate() {
        if block.index != position as u64 + 1 {
            return Err(ChainError::IndexMismatch {
                index: position,
                found: block.index,
            });
        }
    }
    Ok(())
}
