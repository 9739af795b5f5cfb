pub mod consensus;
pub mod fetcher;
pub mod peers;

pub use consensus::ConsensusReconciler;
pub use fetcher::{ChainFetcher, HttpChainFetcher, RemoteChain};
pub use peers::{Node, PeerRegistry};
