use actix_web::{HttpResponse, get, post, web};
use log::info;

use super::models::{AppState, ConnectRequest, NodesResponse, ResolveResponse};
use crate::error::LedgerError;
use crate::network::Node;

/// Register a batch of peers. The whole batch is rejected if any entry is
/// not a usable network location.
#[post("/nodes/connect/")]
pub async fn connect_nodes(
    state: web::Data<AppState>,
    body: web::Json<ConnectRequest>,
) -> Result<HttpResponse, LedgerError> {
    let addresses = body
        .into_inner()
        .nodes
        .filter(|nodes| !nodes.is_empty())
        .ok_or(LedgerError::NoPeersSupplied)?;

    let nodes = addresses
        .iter()
        .map(|address| Node::parse(address))
        .collect::<Result<Vec<_>, _>>()?;

    let total_nodes = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        let added = nodes.into_iter().filter(|node| peers.add(node.clone())).count();
        info!(
            "PEERS - {} new of {} supplied, {} known",
            added,
            addresses.len(),
            peers.len()
        );
        peers.all()
    };

    Ok(HttpResponse::Created().json(NodesResponse {
        message: "All the nodes are now connected",
        total_nodes,
    }))
}

#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> HttpResponse {
    let total_nodes = state.peers.lock().expect("mutex poisoned").all();
    HttpResponse::Ok().json(NodesResponse {
        message: "Known nodes",
        total_nodes,
    })
}

/// Reconcile with every known peer, adopting the longest valid chain.
#[post("/nodes/resolve/")]
pub async fn resolve_chain(state: web::Data<AppState>) -> HttpResponse {
    let peers = state.peers.lock().expect("mutex poisoned").all();
    let outcome = state
        .reconciler
        .reconcile_ledger(&state.ledger, &peers, &state.fetcher)
        .await;

    HttpResponse::Ok().json(ResolveResponse {
        message: if outcome.replaced {
            "Chain was replaced"
        } else {
            "Chain was not replaced"
        },
        replaced: outcome.replaced,
        length: outcome.chain.len(),
        chain: outcome.chain,
    })
}
