use actix_web::{HttpResponse, Responder, get, post, web};
use log::info;

use super::models::{AppState, NewTxRequest, NewTxResponse, PendingResponse};
use crate::error::NodeError;

/// Submit a transfer into the pending buffer. Responds with the index of
/// the block the transaction will eventually belong to.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTxRequest>,
) -> Result<HttpResponse, NodeError> {
    let block_index = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.submit_transaction(&body.sender, &body.recipient, body.amount)?
    };

    info!(
        "TX - {} -> {} ({}) queued for block #{}",
        body.sender, body.recipient, body.amount, block_index
    );

    Ok(HttpResponse::Ok().json(NewTxResponse { block_index }))
}

/// List the transactions waiting for the next block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    let transactions = ledger.pending().to_vec();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
