use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;

use crate::blockchain::{Block, validate};
use crate::error::{NodeError, Result};

/// Bound on each peer chain fetch so one unresponsive peer cannot stall
/// resolution.
pub const PEER_TIMEOUT_SECS: u64 = 5;

/// Wire shape of a peer's `GET /api/v1/chain/` response.
#[derive(Debug, Deserialize)]
pub struct PeerChain {
    pub length: usize,
    pub chain: Vec<Block>,
}

/// HTTP client for peer fetches with the per-request timeout baked in.
/// Built once at startup and cloned into fetch tasks.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(PEER_TIMEOUT_SECS))
        .build()
        .expect("reqwest client")
}

/// Fetch one peer's full chain. Transport failures, timeouts, non-2xx
/// statuses and malformed bodies all map to `PeerUnreachable`.
async fn fetch_chain(client: &reqwest::Client, peer: &str) -> Result<PeerChain> {
    let url = format!("http://{peer}/api/v1/chain/");

    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| NodeError::PeerUnreachable {
            peer: peer.to_string(),
            reason: e.to_string(),
        })?;

    response
        .json::<PeerChain>()
        .await
        .map_err(|e| NodeError::PeerUnreachable {
            peer: peer.to_string(),
            reason: e.to_string(),
        })
}

/// Query every peer concurrently and pick the longest valid chain that beats
/// `local_len`. Unreachable peers are logged and skipped; `None` means the
/// local chain stands.
pub async fn resolve(
    client: &reqwest::Client,
    peers: Vec<String>,
    local_len: usize,
    difficulty: u32,
) -> Option<Vec<Block>> {
    let mut tasks = Vec::with_capacity(peers.len());
    for peer in peers {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let fetched = fetch_chain(&client, &peer).await;
            (peer, fetched)
        }));
    }

    let mut fetched = Vec::new();
    for task in tasks {
        match task.await {
            Ok((peer, Ok(remote))) => {
                debug!("peer {peer} reports a chain of {} blocks", remote.length);
                fetched.push(remote);
            }
            Ok((peer, Err(err))) => warn!("skipping peer {peer}: {err}"),
            Err(err) => warn!("peer fetch task failed: {err}"),
        }
    }

    pick_candidate(local_len, fetched, difficulty)
}

/// Strict longest-valid-chain selection: a fetched chain becomes the
/// candidate only when its reported length beats the running maximum AND the
/// chain itself validates. Equal lengths never replace, and an invalid chain
/// is simply excluded from candidacy.
pub fn pick_candidate(
    local_len: usize,
    fetched: Vec<PeerChain>,
    difficulty: u32,
) -> Option<Vec<Block>> {
    let mut max_length = local_len;
    let mut candidate = None;

    for remote in fetched {
        if remote.length > max_length && validate::is_valid(&remote.chain, difficulty) {
            max_length = remote.length;
            candidate = Some(remote.chain);
        }
    }

    candidate
}
