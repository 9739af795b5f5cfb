use actix_web::{HttpResponse, get, post, web};
use log::{info, warn};

use super::models::{AppState, NewTxResponse, PendingResponse};
use crate::error::LedgerError;
use crate::transaction::TransactionDraft;

/// Submit a transaction into the pending pool.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<TransactionDraft>,
) -> Result<HttpResponse, LedgerError> {
    let index = state
        .ledger
        .write()
        .expect("ledger lock poisoned")
        .add_transaction(body.into_inner())
        .inspect_err(|e| warn!("POST /transactions/ - rejected: {e}"))?;

    info!("POST /transactions/ - queued for block #{index}");
    Ok(HttpResponse::Created().json(NewTxResponse {
        message: format!("This transaction will be added to Block {index}"),
        index,
    }))
}

/// List transactions waiting for the next block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> HttpResponse {
    let ledger = state.ledger.read().expect("ledger lock poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending().to_vec(),
    })
}
