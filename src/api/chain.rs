use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;
use std::sync::atomic::Ordering;

use super::models::{AppState, ChainResponse, MineResponse, ValidateResponse};
use crate::blockchain::hash;
use crate::error::NodeError;

/// Get the full chain. This is also the wire format served to peers during
/// consensus resolution.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let resp = ChainResponse {
        length: ledger.len(),
        chain: &ledger.chain,
    };
    HttpResponse::Ok().json(resp)
}

/// Validate the local chain (linkage + proofs).
#[get("/chain/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ValidateResponse {
        valid: ledger.is_valid(),
        length: ledger.len(),
    })
}

/// Run the mining sequence: solve the puzzle seeded by the last block's
/// proof, credit the reward to this node, forge the pending transactions
/// into a new block.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> Result<HttpResponse, NodeError> {
    // A stale abort left over from an earlier consensus swap must not kill
    // this run.
    state.abort_mining.store(false, Ordering::Relaxed);

    let block = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.mine(&state.node_id, &state.abort_mining)?
    };

    let hash = hash::block_digest(&block);
    info!(
        "MINER - sealed block #{} (hash={}, proof={})",
        block.index, hash, block.proof
    );

    Ok(HttpResponse::Ok().json(MineResponse {
        index: block.index,
        hash,
        proof: block.proof,
        previous_hash: block.previous_hash.clone(),
        transactions: block.transactions,
    }))
}
