use log::debug;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use super::Node;
use crate::blockchain::Block;
use crate::error::{FetchError, LedgerError};

/// Route every node exports its chain on.
pub const CHAIN_PATH: &str = "/api/v1/chain/";

/// The part of a peer's chain export the reconciler needs.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteChain {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// Obtains a peer's exported chain.
pub trait ChainFetcher {
    fn fetch_chain(&self, node: &Node) -> impl Future<Output = Result<RemoteChain, FetchError>>;
}

/// Fetches chains over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    client: reqwest::Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::Internal(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, node: &Node) -> Result<RemoteChain, FetchError> {
        let url = format!("{}{}", node.base_url(), CHAIN_PATH);
        debug!("FETCH - GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        resp.json::<RemoteChain>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_chain_ignores_extra_export_fields() {
        let body = serde_json::json!({
            "length": 1,
            "chain": [crate::blockchain::Block::genesis()],
            "pending": [],
            "nodes": [{ "url": "127.0.0.1:5001" }],
        });
        let remote: RemoteChain = serde_json::from_value(body).unwrap();
        assert_eq!(remote.length, 1);
        assert_eq!(remote.chain.len(), 1);
    }

    #[actix_web::test]
    async fn unreachable_peer_is_a_transport_error() {
        let fetcher = HttpChainFetcher::new(Duration::from_millis(500)).unwrap();
        // Port 9 (discard) on loopback is expected to refuse the connection.
        let node = Node::parse("127.0.0.1:9").unwrap();
        let err = fetcher.fetch_chain(&node).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
