use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use crate::utils::normalize_address;

/// Addresses already queried by the trace orchestrator. Survives across
/// runs so a completed crawl is never re-offered as a candidate; the host
/// may serialize it for durable persistence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitedSet {
    addresses: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(
        &self,
        address: &str,
    ) -> bool {
        self.addresses.contains(&normalize_address(address))
    }

    /// Fold a run's session-visited additions into the persistent set.
    /// Called exactly once per run, at completion.
    pub fn commit<I, S>(
        &mut self,
        addresses: I,
    ) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.addresses.len();
        for address in addresses {
            let normalized = normalize_address(address.as_ref());
            if !normalized.is_empty() {
                self.addresses.insert(normalized);
            }
        }
        self.addresses.len() - before
    }

    pub fn snapshot(&self) -> HashSet<String> {
        self.addresses.clone()
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}
