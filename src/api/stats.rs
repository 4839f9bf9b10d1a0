use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, StatsResponse};

#[get("/stats/")]
pub async fn get_stats(state: web::Data<AppState>) -> impl Responder {
    let (height, difficulty, pending_size) = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        (ledger.len(), ledger.difficulty(), ledger.pending().len())
    };
    let peer_count = {
        let peers = state.peers.lock().expect("mutex poisoned");
        peers.len()
    };

    HttpResponse::Ok().json(StatsResponse {
        node_id: state.node_id.clone(),
        height,
        difficulty,
        pending_size,
        peer_count,
    })
}
