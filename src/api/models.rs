use std::sync::Mutex;
use std::sync::atomic::AtomicBool;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blockchain::{Block, Ledger};
use crate::peers::PeerSet;
use crate::transaction::Transaction;

/// Shared application state: this node's identity, its in-memory ledger and
/// the set of known peers. One mutex domain serializes every ledger
/// operation (submission, mining, replacement).
pub struct AppState {
    pub node_id: String,
    pub ledger: Mutex<Ledger>,
    pub peers: Mutex<PeerSet>,
    /// Raised by consensus when a longer chain lands, so an in-flight
    /// proof-of-work search can abandon its now-moot block.
    pub abort_mining: AtomicBool,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(difficulty: u32) -> Self {
        Self {
            node_id: Uuid::new_v4().simple().to_string(),
            ledger: Mutex::new(Ledger::new(difficulty)),
            peers: Mutex::new(PeerSet::new()),
            abort_mining: AtomicBool::new(false),
            http: crate::consensus::http_client(),
        }
    }
}

/* ---------- Chain API Models ---------- */

#[derive(Serialize)]
pub struct ChainResponse<'a> {
    pub length: usize,
    pub chain: &'a [Block],
}

#[derive(Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub length: usize,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub index: u64,
    pub hash: String,
    pub proof: u64,
    pub previous_hash: String,
    pub transactions: Vec<Transaction>,
}

/* ---------- TX API Models ---------- */

#[derive(Deserialize)]
pub struct NewTxRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

#[derive(Serialize)]
pub struct NewTxResponse {
    pub block_index: u64,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub size: usize,
    pub transactions: Vec<Transaction>,
}

/* ---------- Node / Consensus API Models ---------- */

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub registered: Vec<String>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct NodesResponse {
    pub total: usize,
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub replaced: bool,
    pub length: usize,
    pub chain: Vec<Block>,
}

/* ---------- Stats API Models ---------- */

#[derive(Serialize)]
pub struct StatsResponse {
    pub node_id: String,
    pub height: usize,
    pub difficulty: u32,
    pub pending_size: usize,
    pub peer_count: usize,
}
