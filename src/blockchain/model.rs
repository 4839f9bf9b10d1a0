use std::sync::atomic::AtomicBool;

use log::{debug, info};

use super::block::unix_timestamp;
use super::{Block, MINING_REWARD, REWARD_SENDER, hash, pow, validate};
use crate::error::{NodeError, Result};
use crate::transaction::Transaction;

/// In-memory ledger: the chain of blocks plus the buffer of transactions
/// waiting to be forged into the next one.
///
/// The ledger is the only owner of both sequences. The chain grows by append
/// only; the sole exception is the wholesale swap in `replace_chain` after a
/// consensus round found a longer valid chain.
#[derive(Debug)]
pub struct Ledger {
    pub chain: Vec<Block>,
    pending: Vec<Transaction>,
    difficulty: u32,
}

impl Ledger {
    /// Initialize a new ledger with a genesis block.
    pub fn new(difficulty: u32) -> Self {
        let mut ledger = Self {
            chain: Vec::new(),
            pending: Vec::new(),
            difficulty,
        };
        ledger.chain.push(Block::genesis());
        ledger
    }

    /// Return the most recently appended block.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(NodeError::EmptyChain)
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Transactions submitted but not yet forged into a block.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queue a transfer for the next forged block and return the index of
    /// the block it will belong to.
    pub fn submit_transaction(
        &mut self,
        sender: &str,
        recipient: &str,
        amount: f64,
    ) -> Result<u64> {
        if sender.trim().is_empty() {
            return Err(NodeError::Validation("sender is required".into()));
        }
        if recipient.trim().is_empty() {
            return Err(NodeError::Validation("recipient is required".into()));
        }
        if !amount.is_finite() {
            return Err(NodeError::Validation(
                "amount must be a finite number".into(),
            ));
        }

        self.pending.push(Transaction::new(sender, recipient, amount));
        Ok(self.last_block()?.index + 1)
    }

    /// Forge the pending transactions into a new block appended to the
    /// chain. `previous_hash` defaults to the digest of the current last
    /// block; the pending buffer is reset to empty.
    pub fn forge_block(&mut self, proof: u64, previous_hash: Option<String>) -> Result<&Block> {
        let previous_hash = match previous_hash {
            Some(digest) => digest,
            None => hash::block_digest(self.last_block()?),
        };

        let block = Block {
            index: self.chain.len() as u64 + 1,
            timestamp: unix_timestamp(),
            transactions: std::mem::take(&mut self.pending),
            proof,
            previous_hash,
        };
        debug!(
            "forged block #{} with {} txs",
            block.index,
            block.transactions.len()
        );

        self.chain.push(block);
        self.last_block()
    }

    /// Run the full mining sequence: solve the puzzle seeded by the last
    /// block's proof, credit the reward to `miner`, forge.
    ///
    /// The reward transaction is queued after whatever the callers already
    /// submitted, so it comes last in the forged block.
    pub fn mine(&mut self, miner: &str, cancel: &AtomicBool) -> Result<Block> {
        let last_proof = self.last_block()?.proof;
        let proof =
            pow::solve(last_proof, self.difficulty, cancel).ok_or(NodeError::MiningCancelled)?;

        self.submit_transaction(REWARD_SENDER, miner, MINING_REWARD)?;

        let previous_hash = hash::block_digest(self.last_block()?);
        let block = self.forge_block(proof, Some(previous_hash))?.clone();
        info!("sealed block #{} (proof={})", block.index, block.proof);
        Ok(block)
    }

    /// Replace the whole chain with a strictly longer candidate (the
    /// consensus outcome). Returns whether the swap happened. The caller
    /// serializes this against every other ledger operation, so readers see
    /// either the old chain or the new one, never a partial edit.
    pub fn replace_chain(&mut self, candidate: Vec<Block>) -> bool {
        if candidate.len() > self.chain.len() {
            info!(
                "chain replaced: {} -> {} blocks",
                self.chain.len(),
                candidate.len()
            );
            self.chain = candidate;
            true
        } else {
            false
        }
    }

    /// Validate the local chain (linkage + proofs).
    pub fn is_valid(&self) -> bool {
        validate::is_valid(&self.chain, self.difficulty)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use super::Ledger;
    use crate::blockchain::hash;
    use crate::error::NodeError;

    #[test]
    fn genesis_is_present_after_construction() {
        let ledger = Ledger::new(1);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.pending().is_empty());

        let genesis = ledger.last_block().unwrap();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.previous_hash, "1");
        assert_eq!(genesis.proof, 100);
    }

    #[test]
    fn submit_returns_the_next_block_index() {
        let mut ledger = Ledger::new(1);
        let index = ledger.submit_transaction("alice", "bob", 10.0).unwrap();
        assert_eq!(index, 2);
        assert_eq!(ledger.pending().len(), 1);
    }

    #[test]
    fn submit_rejects_malformed_fields() {
        let mut ledger = Ledger::new(1);
        assert!(matches!(
            ledger.submit_transaction("", "bob", 10.0),
            Err(NodeError::Validation(_))
        ));
        assert!(matches!(
            ledger.submit_transaction("alice", "  ", 10.0),
            Err(NodeError::Validation(_))
        ));
        assert!(matches!(
            ledger.submit_transaction("alice", "bob", f64::NAN),
            Err(NodeError::Validation(_))
        ));
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn forge_clears_pending_and_appends_exactly_one_block() {
        let mut ledger = Ledger::new(1);
        ledger.submit_transaction("alice", "bob", 10.0).unwrap();
        ledger.submit_transaction("bob", "carol", 5.0).unwrap();

        let expected_link = hash::block_digest(ledger.last_block().unwrap());
        let block = ledger.forge_block(12345, None).unwrap().clone();

        assert_eq!(block.index, 2);
        assert_eq!(block.proof, 12345);
        assert_eq!(block.previous_hash, expected_link);
        assert_eq!(block.transactions.len(), 2);
        assert_eq!(ledger.len(), 2);
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn mining_appends_submitted_transactions_plus_reward_last() {
        let cancel = AtomicBool::new(false);
        let mut ledger = Ledger::new(1);
        ledger.submit_transaction("alice", "bob", 10.0).unwrap();
        ledger.submit_transaction("bob", "carol", 5.0).unwrap();

        let genesis_digest = hash::block_digest(ledger.last_block().unwrap());
        let block = ledger.mine("node-1", &cancel).unwrap();

        assert_eq!(block.index, 2);
        assert_eq!(block.previous_hash, genesis_digest);
        assert_eq!(block.transactions.len(), 3);
        assert_eq!(block.transactions[0].sender, "alice");
        assert_eq!(block.transactions[1].sender, "bob");

        let reward = &block.transactions[2];
        assert_eq!(reward.sender, "0");
        assert_eq!(reward.recipient, "node-1");
        assert_eq!(reward.amount, 1.0);

        assert_eq!(ledger.len(), 2);
        assert!(ledger.pending().is_empty());
    }

    #[test]
    fn mined_proof_verifies_against_the_previous_one() {
        let cancel = AtomicBool::new(false);
        let mut ledger = Ledger::new(1);
        let block = ledger.mine("node-1", &cancel).unwrap();
        assert!(crate::blockchain::pow::verify(100, block.proof, 1));
    }

    #[test]
    fn cancelled_mining_leaves_the_ledger_untouched() {
        let cancel = AtomicBool::new(true);
        let mut ledger = Ledger::new(4);
        ledger.submit_transaction("alice", "bob", 10.0).unwrap();

        let result = ledger.mine("node-1", &cancel);
        assert!(matches!(result, Err(NodeError::MiningCancelled)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.pending().len(), 1);
    }

    #[test]
    fn replace_chain_requires_a_strictly_longer_candidate() {
        let cancel = AtomicBool::new(false);
        let mut donor = Ledger::new(1);
        donor.mine("donor", &cancel).unwrap();
        donor.mine("donor", &cancel).unwrap();

        let mut ledger = Ledger::new(1);
        ledger.mine("node-1", &cancel).unwrap();
        assert_eq!(ledger.len(), 2);

        // Equal length: no swap.
        let same_length = ledger.chain.clone();
        assert!(!ledger.replace_chain(same_length));

        // Strictly longer: swap.
        assert!(ledger.replace_chain(donor.chain.clone()));
        assert_eq!(ledger.len(), 3);
    }
}
