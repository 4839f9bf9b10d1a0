use std::sync::atomic::{AtomicBool, Ordering};

use sha2::{Digest, Sha256};

/// Check whether `proof` solves the puzzle seeded by `last_proof`: the hex
/// digest of the concatenated decimal strings must start with `difficulty`
/// zero characters.
///
/// Verification is a single hash; solving is expected O(16^difficulty)
/// attempts. Difficulty 0 accepts every proof.
pub fn verify(last_proof: u64, proof: u64, difficulty: u32) -> bool {
    let guess = format!("{last_proof}{proof}");
    let digest = hex::encode(Sha256::digest(guess.as_bytes()));
    digest.chars().take(difficulty as usize).all(|c| c == '0')
}

/// Brute-force the first proof verifying against `last_proof`.
///
/// The search itself is unbounded; `cancel` is polled every iteration and
/// raising it makes the search return `None`. This is how a block made moot
/// by an incoming longer chain gets abandoned instead of solved to the end.
pub fn solve(last_proof: u64, difficulty: u32, cancel: &AtomicBool) -> Option<u64> {
    let mut proof: u64 = 0;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        if verify(last_proof, proof, difficulty) {
            return Some(proof);
        }
        proof = proof.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::{solve, verify};

    #[test]
    fn solved_proof_verifies() {
        let cancel = AtomicBool::new(false);
        let proof = solve(100, 2, &cancel).expect("search was not cancelled");
        assert!(verify(100, proof, 2));
    }

    #[test]
    fn solve_returns_the_first_verifying_proof() {
        let cancel = AtomicBool::new(false);
        let proof = solve(100, 1, &cancel).unwrap();
        assert!((0..proof).all(|earlier| !verify(100, earlier, 1)));
    }

    #[test]
    fn difficulty_zero_accepts_the_first_candidate() {
        let cancel = AtomicBool::new(false);
        assert_eq!(solve(42, 0, &cancel), Some(0));
        assert!(verify(42, 0, 0));
    }

    #[test]
    fn raised_cancel_flag_abandons_the_search() {
        let cancel = AtomicBool::new(true);
        assert_eq!(solve(7, 4, &cancel), None);
    }
}
