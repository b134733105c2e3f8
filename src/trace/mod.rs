pub mod candidates;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Deserialize;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::info;
use tracing::warn;

pub use candidates::HopGroup;
pub use candidates::auto_select_targets;
pub use candidates::eligible_candidates;
pub use candidates::group_by_hop;

use crate::config::TraceConfig;
use crate::error::TraceError;
use crate::fetch::HistoryProvider;
use crate::model::DateRange;
use crate::model::Transaction;
use crate::model::TxKind;
use crate::store::VisitedSet;
use crate::utils::normalize_address;
use crate::utils::truncate_address;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceDirection {
    Both,
    From,
    To,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePhase {
    Idle,
    Configuring,
    Running(usize),
    Completed,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct TraceRequest {
    pub network: String,
    pub targets: Vec<String>,
    pub hops: usize,
    pub direction: TraceDirection,
    pub include_native: bool,
    pub include_erc20: bool,
    pub range: Option<DateRange>,
}

/// Per-hop-layer progress events, mirrored to an optional channel so a UI
/// can render a status line while the crawl runs.
#[derive(Debug, Clone)]
pub enum TraceProgress {
    LayerStarted {
        layer: usize,
        total: usize,
        frontier_size: usize,
    },
    LayerFinished {
        layer: usize,
        discovered: usize,
        next_frontier: usize,
    },
    FinishedEarly {
        layer: usize,
    },
    Finalizing,
}

#[derive(Debug, Clone, Default)]
pub struct TraceOutcome {
    pub transactions: Vec<Transaction>,
    /// Everything queried this run plus what was already visited before
    /// it; the caller commits this into the persistent set on success.
    pub visited: HashSet<String>,
    pub completed_hops: usize,
    pub failed_addresses: Vec<String>,
    pub aborted: bool,
}

/// Stateful multi-hop crawl controller. Fans out batched concurrent
/// history fetches per hop layer, deduplicates against a session-visited
/// set to prevent re-querying and cycles, and accumulates discoveries
/// privately; nothing reaches the store until the caller commits the
/// outcome.
pub struct TraceOrchestrator<P> {
    provider: Arc<P>,
    config: TraceConfig,
    cancel: CancellationToken,
    phase_tx: watch::Sender<TracePhase>,
    progress: Option<mpsc::Sender<TraceProgress>>,
}

impl<P: HistoryProvider> TraceOrchestrator<P> {
    pub fn new(
        provider: Arc<P>,
        config: TraceConfig,
    ) -> Self {
        let (phase_tx, _) = watch::channel(TracePhase::Idle);
        Self {
            provider,
            config,
            cancel: CancellationToken::new(),
            phase_tx,
            progress: None,
        }
    }

    pub fn with_progress(
        mut self,
        sender: mpsc::Sender<TraceProgress>,
    ) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Token for the single cancellation surface: cancelling prevents the
    /// next hop layer from starting. In-flight batches run to completion.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn phase(&self) -> TracePhase {
        *self.phase_tx.borrow()
    }

    pub fn subscribe_phase(&self) -> watch::Receiver<TracePhase> {
        self.phase_tx.subscribe()
    }

    fn set_phase(
        &self,
        phase: TracePhase,
    ) {
        // send_replace updates the value even with no subscribers.
        self.phase_tx.send_replace(phase);
    }

    fn emit(
        &self,
        event: TraceProgress,
    ) {
        if let Some(sender) = &self.progress {
            let _ = sender.try_send(event);
        }
    }

    fn validate(
        &self,
        request: &TraceRequest,
    ) -> Result<(), TraceError> {
        if request.targets.is_empty() {
            return Err(TraceError::NoTargets);
        }
        for target in &request.targets {
            let trimmed = target.trim();
            if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
                return Err(TraceError::InvalidAddress(target.clone()));
            }
        }
        if request.hops == 0 || request.hops > self.config.max_hops {
            return Err(TraceError::TooManyHops {
                requested: request.hops,
                max: self.config.max_hops,
            });
        }
        Ok(())
    }

    /// Run the crawl. `visited` seeds the session-visited set; it is read
    /// here but never written. Committing additions back is the caller's
    /// contract, performed once at run completion.
    pub async fn run(
        &self,
        request: TraceRequest,
        visited: &VisitedSet,
    ) -> Result<TraceOutcome, TraceError> {
        // Input errors reject synchronously, before any async work.
        self.set_phase(TracePhase::Configuring);
        if let Err(e) = self.validate(&request) {
            self.set_phase(TracePhase::Idle);
            return Err(e);
        }

        // Targets are queried even if previously visited; filtering them
        // is the candidate selection's job, not the loop's. Later layers
        // do enforce the visited set.
        let mut session_visited = visited.snapshot();
        let mut frontier: Vec<String> = Vec::new();
        let mut frontier_seen: HashSet<String> = HashSet::new();
        for target in &request.targets {
            let normalized = normalize_address(target);
            if frontier_seen.insert(normalized.clone()) {
                frontier.push(target.trim().to_string());
            }
            session_visited.insert(normalized);
        }

        let mut outcome = TraceOutcome::default();
        info!(
            "trace_started::targets::{}::hops::{}::network::{}",
            frontier.len(),
            request.hops,
            request.network
        );

        for layer in 0..request.hops {
            if self.cancel.is_cancelled() {
                info!("trace_cancelled_before_layer::{}", layer);
                outcome.aborted = true;
                break;
            }
            if frontier.is_empty() {
                info!("trace_finished_early::layer::{}::empty_frontier", layer);
                self.emit(TraceProgress::FinishedEarly { layer });
                break;
            }

            self.set_phase(TracePhase::Running(layer));
            self.emit(TraceProgress::LayerStarted {
                layer,
                total: request.hops,
                frontier_size: frontier.len(),
            });

            let mut layer_transactions: Vec<Transaction> = Vec::new();
            let mut next_frontier: Vec<String> = Vec::new();
            let mut next_seen: HashSet<String> = HashSet::new();

            let batch_count = frontier.len().div_ceil(self.config.batch_size);
            for (batch_index, batch) in frontier.chunks(self.config.batch_size).enumerate() {
                // allSettled semantics: each address resolves to its own
                // Result; a failure never cancels its batch siblings.
                let fetches = batch.iter().map(|address| {
                    let provider = self.provider.clone();
                    let network = request.network.clone();
                    let range = request.range;
                    async move {
                        let result = provider.fetch_history(address, &network, range.as_ref()).await;
                        (address.clone(), result)
                    }
                });

                for (address, result) in join_all(fetches).await {
                    let transactions = match result {
                        Ok(transactions) => transactions,
                        Err(e) => {
                            warn!(
                                "trace_fetch_failed::address::{}::error::{}",
                                truncate_address(&address),
                                e
                            );
                            outcome.failed_addresses.push(address);
                            continue;
                        },
                    };

                    for tx in transactions {
                        if tx.kind == TxKind::Native && !request.include_native {
                            continue;
                        }
                        if tx.kind == TxKind::Erc20 && !request.include_erc20 {
                            continue;
                        }

                        let Some(neighbor) = direction_neighbor(&tx, &address, request.direction)
                        else {
                            continue;
                        };
                        let neighbor = normalize_address(&neighbor);
                        if neighbor.is_empty() {
                            continue;
                        }

                        layer_transactions.push(tx);
                        if !session_visited.contains(&neighbor) && next_seen.insert(neighbor.clone()) {
                            next_frontier.push(neighbor);
                        }
                    }
                }

                if batch_index + 1 < batch_count {
                    tokio::time::sleep(Duration::from_millis(self.config.inter_batch_delay_ms)).await;
                }
            }

            // Failed addresses are marked visited too, so a flaky endpoint
            // cannot trap the crawl in a retry loop.
            for address in &frontier {
                session_visited.insert(normalize_address(address));
            }

            debug!(
                "trace_layer_done::layer::{}::discovered::{}::next_frontier::{}",
                layer,
                layer_transactions.len(),
                next_frontier.len()
            );
            self.emit(TraceProgress::LayerFinished {
                layer,
                discovered: layer_transactions.len(),
                next_frontier: next_frontier.len(),
            });

            outcome.transactions.extend(layer_transactions);
            outcome.completed_hops = layer + 1;
            frontier = next_frontier;
        }

        self.emit(TraceProgress::Finalizing);
        outcome.visited = session_visited;
        self.set_phase(if outcome.aborted { TracePhase::Aborted } else { TracePhase::Completed });
        info!(
            "trace_finished::transactions::{}::hops::{}::failed::{}",
            outcome.transactions.len(),
            outcome.completed_hops,
            outcome.failed_addresses.len()
        );

        Ok(outcome)
    }
}

/// Direction validity relative to the queried address: the address must
/// sit at the configured end of the transfer; the neighbor is the other
/// endpoint.
pub fn direction_neighbor(
    tx: &Transaction,
    queried: &str,
    direction: TraceDirection,
) -> Option<String> {
    let addr = normalize_address(queried);
    let is_from = normalize_address(&tx.from) == addr;
    let is_to = normalize_address(&tx.to) == addr;

    match direction {
        TraceDirection::From if is_from => Some(tx.to.clone()),
        TraceDirection::To if is_to => Some(tx.from.clone()),
        TraceDirection::Both if is_from => Some(tx.to.clone()),
        TraceDirection::Both if is_to => Some(tx.from.clone()),
        _ => None,
    }
}
