use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// A single block in the ledger holding the transactions forged into it.
///
/// The struct doubles as the wire representation: `index`, `timestamp`,
/// `transactions`, `proof` and `previous_hash` are exactly the keys peers
/// exchange. There is no cached hash field; digests are recomputed from
/// content (see `hash::block_digest`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: f64, // Unix timestamp, fractional seconds (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create the genesis block (first block in the chain).
    pub fn genesis() -> Self {
        Self {
            index: 1,
            timestamp: unix_timestamp(),
            transactions: Vec::new(),
            proof: GENESIS_PROOF,
            previous_hash: String::from(GENESIS_PREVIOUS_HASH),
        }
    }
}

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub fn unix_timestamp() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
