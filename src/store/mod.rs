pub mod seeds;
pub mod visited;

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

pub use seeds::SeedAddressSet;
pub use visited::VisitedSet;

use crate::model::Transaction;
use crate::model::TxKind;
use crate::utils::normalize_address;

/// In-memory source of truth for the loaded transaction set. External
/// collaborators (import, fetch, manual edits) mutate it through the
/// append/replace contract; graph builds only read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    #[serde(skip)]
    hashes: HashSet<String>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let mut store = Self::new();
        store.replace_all(transactions);
        store
    }

    // Rebuild the hash index from the record list (needed after
    // deserialization, where the index is skipped).
    fn rebuild_hashes(&mut self) {
        self.hashes = self
            .transactions
            .iter()
            .filter(|t| !t.hash.is_empty())
            .map(|t| t.hash.clone())
            .collect();
    }

    fn ensure_hashes(&mut self) {
        if self.hashes.is_empty() && !self.transactions.is_empty() {
            self.rebuild_hashes();
        }
    }

    /// Merge new records, deduplicating by `hash` against existing entries
    /// and within the incoming batch. Blank hashes always merge. New
    /// entries are prepended (newest-first display order). Returns the
    /// number of records actually merged.
    pub fn append(
        &mut self,
        new: Vec<Transaction>,
    ) -> usize {
        self.ensure_hashes();

        let mut merged = Vec::new();
        for tx in new {
            if tx.hash.is_empty() || self.hashes.insert(tx.hash.clone()) {
                merged.push(tx);
            }
        }

        let count = merged.len();
        if count > 0 {
            merged.extend(std::mem::take(&mut self.transactions));
            self.transactions = merged;
        }
        debug!("store_append::merged::{}", count);
        count
    }

    /// Unconditional overwrite, used on fresh table loads.
    pub fn replace_all(
        &mut self,
        transactions: Vec<Transaction>,
    ) {
        self.transactions = transactions;
        self.rebuild_hashes();
        debug!("store_replace_all::count::{}", self.transactions.len());
    }

    /// Remove records of `kind` with value below `threshold`. Returns the
    /// number removed.
    pub fn remove_below(
        &mut self,
        threshold: f64,
        kind: TxKind,
    ) -> usize {
        let before = self.transactions.len();
        self.transactions.retain(|t| !(t.kind == kind && t.value < threshold));
        self.rebuild_hashes();
        before - self.transactions.len()
    }

    /// Remove every record carrying `token`. Returns the number removed.
    pub fn remove_token(
        &mut self,
        token: &str,
    ) -> usize {
        let before = self.transactions.len();
        self.transactions.retain(|t| t.token != token);
        self.rebuild_hashes();
        before - self.transactions.len()
    }

    /// Lowercased set of every endpoint currently in the store.
    pub fn known_addresses(&self) -> HashSet<String> {
        let mut addresses = HashSet::new();
        for tx in &self.transactions {
            addresses.insert(normalize_address(&tx.from));
            addresses.insert(normalize_address(&tx.to));
        }
        addresses
    }

    /// Sorted distinct token symbols for the given kind.
    pub fn available_tokens(
        &self,
        kind: TxKind,
    ) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .transactions
            .iter()
            .filter(|t| t.kind == kind && !t.token.is_empty())
            .map(|t| t.token.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        tokens.sort();
        tokens
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
