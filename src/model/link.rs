use serde::Deserialize;
use serde::Serialize;

/// Aggregate of every transaction sharing the same directed (from, to)
/// pair. `bidirectional` is set when the reverse pair also aggregated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    pub value: f64,
    pub count: usize,
    pub bidirectional: bool,
}
