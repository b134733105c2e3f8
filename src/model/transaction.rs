use chrono::DateTime;
use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde::Serialize;

use crate::utils::age_since;
use crate::utils::normalize_address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Native,
    Erc20,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Pending,
    Failed,
}

/// A single transfer record. Immutable once created; identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub hash: String,
    pub method: String,
    pub block: u64,
    pub timestamp: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub value: f64,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub status: TxStatus,
}

impl Transaction {
    /// Client-side id for records that arrive without one (CSV rows,
    /// explorer payloads). Short base36, collision-irrelevant since the
    /// store dedups on `hash`.
    pub fn generate_id() -> String {
        const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
        let mut rng = rand::rng();
        (0..9).map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char).collect()
    }

    pub fn involves(
        &self,
        address: &str,
    ) -> bool {
        let addr = normalize_address(address);
        normalize_address(&self.from) == addr || normalize_address(&self.to) == addr
    }

    /// The endpoint on the far side of `address`, if `address` is one of the
    /// endpoints. A self-transfer reports the same address back.
    pub fn counterparty_of(
        &self,
        address: &str,
    ) -> Option<&str> {
        let addr = normalize_address(address);
        if normalize_address(&self.from) == addr {
            Some(&self.to)
        } else if normalize_address(&self.to) == addr {
            Some(&self.from)
        } else {
            None
        }
    }

    pub fn age_of(
        &self,
        now: DateTime<Utc>,
    ) -> String {
        age_since(self.timestamp, now)
    }
}
