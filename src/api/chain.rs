use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::error::LedgerError;

pub const MINED_MESSAGE: &str = "Congratulations, you just mined a block";

/// Export the full chain. Peers read `length` and `chain` from this payload.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> HttpResponse {
    let (chain, pending) = {
        let ledger = state.ledger.read().expect("ledger lock poisoned");
        (ledger.chain_snapshot(), ledger.pending().to_vec())
    };
    let nodes = state.peers.lock().expect("mutex poisoned").all();

    HttpResponse::Ok().json(ChainResponse {
        length: chain.len(),
        chain,
        pending,
        nodes,
    })
}

/// Validate the whole local chain.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> HttpResponse {
    let chain = state
        .ledger
        .read()
        .expect("ledger lock poisoned")
        .chain_snapshot();
    HttpResponse::Ok().json(ValidateResponse {
        valid: state.validator.is_valid(&chain),
        length: chain.len(),
    })
}

/// Mine a block from the pending pool. The proof search runs on the
/// blocking pool so it does not stall the worker.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    let worker = state.clone();
    let block = web::block(move || worker.mine())
        .await
        .map_err(|e| LedgerError::Internal(e.to_string()))??;

    info!(
        "MINER - sealed block #{} (proof={}, txs={})",
        block.index,
        block.proof,
        block.transactions.len()
    );
    Ok(HttpResponse::Ok().json(MineResponse {
        message: MINED_MESSAGE,
        block,
    }))
}
