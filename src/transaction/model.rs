use serde::{Deserialize, Serialize};

/// A value transfer between two addresses.
///
/// Transactions carry no identity of their own: equality is structural and
/// their only ordering is the position inside the block that forged them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(sender: &str, recipient: &str, amount: f64) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Transaction;

    #[test]
    fn equality_is_structural() {
        let a = Transaction::new("alice", "bob", 10.0);
        let b = Transaction::new("alice", "bob", 10.0);
        assert_eq!(a, b);
        assert_ne!(a, Transaction::new("alice", "bob", 10.5));
    }

    #[test]
    fn serializes_with_fixed_keys() {
        let tx = Transaction::new("alice", "bob", 10.0);
        let value = serde_json::to_value(&tx).unwrap();
        let object = value.as_object().unwrap();
        let keys: Vec<&str> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, ["amount", "recipient", "sender"]);
    }
}
