use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};
use std::sync::atomic::Ordering;

use super::models::{AppState, NodesResponse, RegisterRequest, RegisterResponse, ResolveResponse};
use crate::consensus;
use crate::error::NodeError;

/// Register one or more peer addresses.
#[post("/nodes/register/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, NodeError> {
    if body.nodes.is_empty() {
        return Err(NodeError::Validation(
            "a non-empty list of nodes is required".into(),
        ));
    }

    let mut registered = Vec::with_capacity(body.nodes.len());
    let total = {
        let mut peers = state.peers.lock().expect("mutex poisoned");
        for address in &body.nodes {
            registered.push(peers.register(address)?);
        }
        peers.len()
    };

    info!("PEERS - registered {registered:?} ({total} total)");
    Ok(HttpResponse::Ok().json(RegisterResponse { registered, total }))
}

/// List registered peers.
#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let peers = state.peers.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(NodesResponse {
        total: peers.len(),
        nodes: peers.addresses(),
    })
}

/// Consensus trigger: fetch every peer's chain and adopt the longest valid
/// one if it beats ours.
#[get("/nodes/resolve/")]
pub async fn resolve_conflicts(state: web::Data<AppState>) -> impl Responder {
    let peers = {
        let set = state.peers.lock().expect("mutex poisoned");
        set.addresses()
    };
    let (local_len, difficulty) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.len(), ledger.difficulty())
    };

    // The network fan-out runs with no locks held.
    let candidate = consensus::resolve(&state.http, peers, local_len, difficulty).await;

    let (replaced, length, chain) = match candidate {
        Some(new_chain) => {
            // Let an in-flight solve abandon its now-moot block before we
            // wait on the ledger lock.
            state.abort_mining.store(true, Ordering::Relaxed);

            let mut ledger = state.ledger.lock().expect("mutex poisoned");
            let replaced = ledger.replace_chain(new_chain);
            if !replaced {
                warn!("CONSENSUS - local chain caught up, keeping ours");
            }
            (replaced, ledger.len(), ledger.chain.clone())
        }
        None => {
            let ledger = state.ledger.lock().expect("mutex poisoned");
            (false, ledger.len(), ledger.chain.clone())
        }
    };

    if replaced {
        info!("CONSENSUS - chain replaced ({length} blocks)");
    }

    HttpResponse::Ok().json(ResolveResponse {
        replaced,
        length,
        chain,
    })
}
