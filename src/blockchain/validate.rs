use super::{Block, hash, pow};

/// Walk a candidate chain checking hash linkage and proof validity for every
/// adjacent pair of blocks. Returns false on the first violated invariant.
/// Empty and single-block chains are trivially valid.
pub fn is_valid(chain: &[Block], difficulty: u32) -> bool {
    for pair in chain.windows(2) {
        let (prev, current) = (&pair[0], &pair[1]);

        if current.previous_hash != hash::block_digest(prev) {
            return false;
        }
        if !pow::verify(prev.proof, current.proof, difficulty) {
            return false;
        }
    }
    true
}
