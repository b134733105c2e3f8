use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Wallet,
    Contract,
    Exchange,
}

impl NodeKind {
    /// Lexical classification from the address/label text. Explorer data
    /// carries named entities ("Binance 8", "Starknet Bridge") in place of
    /// raw addresses, which is what these hints key on.
    pub fn classify(id: &str) -> Self {
        let lower = id.to_lowercase();
        if lower.contains("binance") || lower.contains("kraken") {
            return NodeKind::Exchange;
        }
        if lower.contains("bridge") || lower.contains("safe") {
            return NodeKind::Contract;
        }
        NodeKind::Wallet
    }
}

/// Derived per graph build; regenerated on every rebuild, never persisted.
/// Simulation coordinates live in the layout engine, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressNode {
    pub id: String,
    pub balance: f64,
    pub kind: NodeKind,
    pub group_id: usize,
    pub group_size: usize,
    pub group_color: String,
    pub hop: Option<u32>,
}
