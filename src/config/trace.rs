use serde::Deserialize;
use serde::Serialize;

use crate::constants::TRACE_BATCH_SIZE;
use crate::constants::TRACE_INTER_BATCH_DELAY_MS;
use crate::constants::TRACE_MAX_HOPS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    pub batch_size: usize,
    pub inter_batch_delay_ms: u64,
    pub max_hops: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            batch_size: TRACE_BATCH_SIZE,
            inter_batch_delay_ms: TRACE_INTER_BATCH_DELAY_MS,
            max_hops: TRACE_MAX_HOPS,
        }
    }
}
