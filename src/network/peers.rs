use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

use crate::error::LedgerError;

/// A remote node, identified by its network location (`host[:port]`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Node {
    pub url: String,
}

impl Node {
    /// Reduce a user-supplied address to its network location.
    /// `http://127.0.0.1:5001/` and `127.0.0.1:5001` both become `127.0.0.1:5001`.
    /// An explicit scheme keeps its default port: `https://peer` becomes `peer:443`.
    pub fn parse(address: &str) -> Result<Self, LedgerError> {
        let trimmed = address.trim();
        let invalid = || LedgerError::InvalidPeerLocation(address.to_string());
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let explicit_scheme = trimmed.contains("://");
        let with_scheme = if explicit_scheme {
            trimmed.to_string()
        } else {
            format!("http://{trimmed}")
        };
        let parsed = Url::parse(&with_scheme).map_err(|_| invalid())?;
        let host = parsed.host_str().ok_or_else(invalid)?;

        let port = if explicit_scheme {
            parsed.port_or_known_default()
        } else {
            parsed.port()
        };
        let url = match port {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        Ok(Self { url })
    }

    /// Base URL used to reach this node's HTTP interface.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.url)
    }
}

/// Known peers, deduplicated by normalised network location.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    locations: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer. Returns `false` when the location was already known.
    pub fn add(&mut self, node: Node) -> bool {
        self.locations.insert(node.url)
    }

    pub fn all(&self) -> Vec<Node> {
        self.locations
            .iter()
            .map(|url| Node { url: url.clone() })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_only_the_network_location() {
        assert_eq!(
            Node::parse("http://127.0.0.1:5001").unwrap().url,
            "127.0.0.1:5001"
        );
        assert_eq!(
            Node::parse("http://127.0.0.1:5001/get_chain?x=1").unwrap().url,
            "127.0.0.1:5001"
        );
        assert_eq!(Node::parse(" 10.0.0.2:5002 ").unwrap().url, "10.0.0.2:5002");
        assert_eq!(Node::parse("localhost:5003").unwrap().url, "localhost:5003");
        assert_eq!(Node::parse("peer.example").unwrap().url, "peer.example");
    }

    #[test]
    fn explicit_scheme_keeps_its_default_port() {
        assert_eq!(
            Node::parse("http://peer.example").unwrap().url,
            "peer.example:80"
        );
        assert_eq!(
            Node::parse("https://peer.example").unwrap().url,
            "peer.example:443"
        );
        assert_eq!(
            Node::parse("https://peer.example:443/").unwrap().url,
            "peer.example:443"
        );
        assert_ne!(
            Node::parse("https://peer.example:443").unwrap(),
            Node::parse("peer.example").unwrap()
        );
    }

    #[test]
    fn parse_rejects_blank_and_hostless() {
        assert!(matches!(
            Node::parse("   "),
            Err(LedgerError::InvalidPeerLocation(_))
        ));
        assert!(matches!(
            Node::parse("http://"),
            Err(LedgerError::InvalidPeerLocation(_))
        ));
    }

    #[test]
    fn registering_twice_keeps_one_entry() {
        let mut registry = PeerRegistry::new();
        assert!(registry.add(Node::parse("http://127.0.0.1:5001").unwrap()));
        assert!(!registry.add(Node::parse("http://127.0.0.1:5001").unwrap()));
        // Same location spelled differently.
        assert!(!registry.add(Node::parse("127.0.0.1:5001/").unwrap()));
        assert_eq!(registry.len(), 1);

        assert!(registry.add(Node::parse("127.0.0.1:5002").unwrap()));
        let urls: Vec<String> = registry.all().into_iter().map(|n| n.url).collect();
        assert_eq!(urls, vec!["127.0.0.1:5001", "127.0.0.1:5002"]);
    }

    #[test]
    fn base_url_uses_http() {
        let node = Node::parse("127.0.0.1:5001").unwrap();
        assert_eq!(node.base_url(), "http://127.0.0.1:5001");
    }
}
