use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Runtime settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    /// This node's identity; the sender of mining rewards.
    pub node_address: String,
    pub miner_receiver: String,
    /// `0` disables the reward transaction.
    pub mining_reward: u64,
    pub peer_timeout: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            node_address: Uuid::new_v4().simple().to_string(),
            miner_receiver: "miner".to_string(),
            mining_reward: 10,
            peer_timeout: Duration::from_secs(5),
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "PORT", defaults.port),
            node_address: lookup("NODE_ADDRESS")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.node_address),
            miner_receiver: lookup("MINER_RECEIVER").unwrap_or(defaults.miner_receiver),
            mining_reward: parsed(&lookup, "MINING_REWARD", defaults.mining_reward),
            peer_timeout: Duration::from_secs(parsed(
                &lookup,
                "PEER_TIMEOUT_SECS",
                defaults.peer_timeout.as_secs(),
            )),
        }
    }
}

fn parsed<T: FromStr + Copy>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("CONFIG - {key}={raw:?} is not valid, using default");
            default
        }),
        None => default,
    }
}
