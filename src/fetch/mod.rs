pub mod explorer;

use async_trait::async_trait;

pub use explorer::HttpExplorer;

use crate::error::FetchError;
use crate::model::DateRange;
use crate::model::Transaction;

/// Address-history source consumed by the trace orchestrator and the
/// manual fetch flow. Implementations report per-address failures through
/// the Result; the orchestrator guarantees one failing address never
/// cancels its batch siblings.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_history(
        &self,
        address: &str,
        network: &str,
        range: Option<&DateRange>,
    ) -> Result<Vec<Transaction>, FetchError>;
}
