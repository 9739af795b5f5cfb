use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use thiserror::Error;

/// Request-scoped failures surfaced by the ledger node.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("malformed transaction: `{0}` is missing or not valid")]
    MalformedTransaction(&'static str),
    #[error("malformed request body: {0}")]
    MalformedRequest(String),
    #[error("no peers supplied")]
    NoPeersSupplied,
    #[error("invalid peer location `{0}`")]
    InvalidPeerLocation(String),
    #[error("mining cancelled before a proof was found")]
    MiningCancelled,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::MalformedTransaction(_)
            | LedgerError::MalformedRequest(_)
            | LedgerError::NoPeersSupplied
            | LedgerError::InvalidPeerLocation(_) => StatusCode::BAD_REQUEST,
            LedgerError::MiningCancelled => StatusCode::SERVICE_UNAVAILABLE,
            LedgerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

/// Failure to obtain a chain from one peer. Scoped to that peer only.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("peer unreachable: {0}")]
    Transport(String),
    #[error("peer answered with status {0}")]
    Status(u16),
    #[error("peer payload could not be decoded: {0}")]
    Decode(String),
}

/// Why a candidate chain was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("chain is empty")]
    Empty,
    #[error("block at position {index} does not link to its predecessor")]
    BrokenLink { index: usize },
    #[error("block at position {index} carries a proof that fails the puzzle")]
    InvalidProof { index: usize },
    #[error("chain does not start with the genesis block")]
    BadGenesis,
    #[error("block at position {index} carries index {found}")]
    IndexMismatch { index: usize, found: u64 },
    #[error("peer reported length {reported} but sent {actual} blocks")]
    LengthMismatch { reported: usize, actual: usize },
}
