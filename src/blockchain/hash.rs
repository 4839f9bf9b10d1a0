use sha2::{Digest, Sha256};

use super::Block;

/// SHA-256 digest of a block's canonical serialization, lowercase hex.
///
/// The block goes through `serde_json::Value`, whose object maps keep keys
/// in sorted order, so the preimage is independent of struct field order and
/// identical content always yields an identical digest.
pub fn block_digest(block: &Block) -> String {
    let value = serde_json::to_value(block).expect("block serializes to JSON");
    let mut hasher = Sha256::new();
    hasher.update(value.to_string().as_bytes());
    hex::encode(hasher.finalize())
}
