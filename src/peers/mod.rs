use std::collections::HashSet;

use url::Url;

use crate::error::{NodeError, Result};

/// Registered peer addresses, kept as unique normalized `host:port` pairs.
///
/// Mutated only through registration; consensus reads snapshots.
#[derive(Debug, Default)]
pub struct PeerSet {
    set: HashSet<String>,
}

impl PeerSet {
    pub fn new() -> Self {
        Self {
            set: HashSet::new(),
        }
    }

    /// Register a peer address. Accepts full URLs or bare `host:port` and
    /// stores the normalized network location. Returns the stored form.
    pub fn register(&mut self, address: &str) -> Result<String> {
        let netloc = normalize_address(address)?;
        self.set.insert(netloc.clone());
        Ok(netloc)
    }

    pub fn contains(&self, netloc: &str) -> bool {
        self.set.contains(netloc)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Sorted snapshot of all registered addresses.
    pub fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<String> = self.set.iter().cloned().collect();
        addresses.sort();
        addresses
    }
}

/// Reduce an address to its `host:port` network location.
fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    if trimmed.is_empty() {
        return Err(NodeError::Validation("peer address is required".into()));
    }

    let parsed = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .map_err(|_| NodeError::Validation(format!("invalid peer address: {trimmed}")))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| NodeError::Validation(format!("invalid peer address: {trimmed}")))?;

    match parsed.port_or_known_default() {
        Some(port) => Ok(format!("{host}:{port}")),
        None => Ok(host.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::PeerSet;
    use crate::error::NodeError;

    #[test]
    fn registers_full_urls_as_netloc() {
        let mut peers = PeerSet::new();
        let stored = peers.register("http://192.168.0.5:5000").unwrap();
        assert_eq!(stored, "192.168.0.5:5000");
        assert!(peers.contains("192.168.0.5:5000"));
    }

    #[test]
    fn registers_bare_host_port() {
        let mut peers = PeerSet::new();
        assert_eq!(peers.register("node-b:8081").unwrap(), "node-b:8081");
    }

    #[test]
    fn missing_port_falls_back_to_the_scheme_default() {
        let mut peers = PeerSet::new();
        assert_eq!(peers.register("http://example.com").unwrap(), "example.com:80");
    }

    #[test]
    fn duplicate_registrations_collapse() {
        let mut peers = PeerSet::new();
        peers.register("http://10.0.0.2:5000").unwrap();
        peers.register("10.0.0.2:5000").unwrap();
        assert_eq!(peers.len(), 1);
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        let mut peers = PeerSet::new();
        assert!(matches!(
            peers.register(""),
            Err(NodeError::Validation(_))
        ));
        assert!(matches!(
            peers.register("http://"),
            Err(NodeError::Validation(_))
        ));
        assert!(matches!(
            peers.register("not a url"),
            Err(NodeError::Validation(_))
        ));
        assert!(peers.is_empty());
    }

    #[test]
    fn addresses_snapshot_is_sorted() {
        let mut peers = PeerSet::new();
        peers.register("node-b:8081").unwrap();
        peers.register("node-a:8081").unwrap();
        assert_eq!(peers.addresses(), ["node-a:8081", "node-b:8081"]);
    }
}
