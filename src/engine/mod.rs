pub mod tracer;

use tracing::info;

use crate::config::GraphConfig;
use crate::error::TraceError;
use crate::fetch::HistoryProvider;
use crate::graph::GraphView;
use crate::graph::build_graph;
use crate::layout::LayoutEngine;
use crate::model::AddressNode;
use crate::model::GraphFilter;
use crate::model::Transaction;
use crate::model::TxKind;
use crate::store::SeedAddressSet;
use crate::store::TransactionStore;
use crate::store::VisitedSet;
use crate::trace::TraceOrchestrator;
use crate::trace::TraceOutcome;
use crate::trace::TraceRequest;
use crate::trace::eligible_candidates;

/// One exploration session: the owned state containers (store, seeds,
/// visited set), the current filter, the derived graph and its layout.
/// All mutation goes through the defined operations; the graph and layout
/// are re-derived on every relevant change.
pub struct Session {
    store: TransactionStore,
    seeds: SeedAddressSet,
    visited: VisitedSet,
    layout: LayoutEngine,
    filter: GraphFilter,
    view: GraphView,
}

impl Session {
    pub fn new(graph_config: &GraphConfig) -> Self {
        Self {
            store: TransactionStore::new(),
            seeds: SeedAddressSet::new(),
            visited: VisitedSet::new(),
            layout: LayoutEngine::new(graph_config.viewport_width, graph_config.viewport_height),
            filter: GraphFilter::for_kind(TxKind::Native),
            view: GraphView::empty(),
        }
    }

    /// Re-run the pure graph build and carry the layout state across it.
    pub fn rebuild(&mut self) -> &GraphView {
        self.view = build_graph(self.store.transactions(), &self.filter, &self.seeds);
        self.layout.sync(&self.view);
        &self.view
    }

    pub fn set_filter(
        &mut self,
        filter: GraphFilter,
    ) -> &GraphView {
        self.filter = filter;
        self.rebuild()
    }

    pub fn add_seed_addresses<'a>(
        &mut self,
        addresses: impl IntoIterator<Item = &'a str>,
    ) -> usize {
        let added = self.seeds.add_many(addresses);
        if added > 0 {
            self.rebuild();
        }
        added
    }

    pub fn append_transactions(
        &mut self,
        transactions: Vec<Transaction>,
    ) -> usize {
        let merged = self.store.append(transactions);
        if merged > 0 {
            self.rebuild();
        }
        merged
    }

    pub fn replace_transactions(
        &mut self,
        transactions: Vec<Transaction>,
    ) {
        self.store.replace_all(transactions);
        self.rebuild();
    }

    /// Run a trace and commit its outcome. Discoveries merge into the
    /// store (hash dedup is the store's contract) and the session-visited
    /// additions become persistent; a run with zero discoveries still
    /// marks its targets visited so they are not re-offered.
    pub async fn run_trace<P: HistoryProvider>(
        &mut self,
        orchestrator: &TraceOrchestrator<P>,
        request: TraceRequest,
    ) -> Result<TraceOutcome, TraceError> {
        let targets = request.targets.clone();
        let outcome = orchestrator.run(request, &self.visited).await?;

        if outcome.transactions.is_empty() {
            self.visited.commit(targets.iter().map(String::as_str));
            info!("trace_committed::no_discoveries::targets_marked::{}", targets.len());
        } else {
            let merged = self.store.append(outcome.transactions.clone());
            self.visited.commit(outcome.visited.iter().map(String::as_str));
            self.rebuild();
            info!("trace_committed::merged::{}::visited_total::{}", merged, self.visited.len());
        }

        Ok(outcome)
    }

    /// Manual fetch flow: pull one address's history and merge it. Shares
    /// the trace crawler's provider seam.
    pub async fn fetch_and_append<P: HistoryProvider>(
        &mut self,
        provider: &P,
        address: &str,
        network: &str,
        range: Option<&crate::model::DateRange>,
    ) -> Result<usize, crate::error::FetchError> {
        let transactions = provider.fetch_history(address, network, range).await?;
        Ok(self.append_transactions(transactions))
    }

    pub fn trace_candidates(&self) -> Vec<&AddressNode> {
        eligible_candidates(&self.view.nodes, &self.seeds, &self.visited)
    }

    pub fn view(&self) -> &GraphView {
        &self.view
    }

    pub fn layout_mut(&mut self) -> &mut LayoutEngine {
        &mut self.layout
    }

    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    pub fn store(&self) -> &TransactionStore {
        &self.store
    }

    pub fn seeds(&self) -> &SeedAddressSet {
        &self.seeds
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn filter(&self) -> &GraphFilter {
        &self.filter
    }
}
