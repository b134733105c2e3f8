pub mod bfs;
pub mod cluster;
pub mod scale;

use std::collections::HashMap;
use std::collections::HashSet;

use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::Serialize;
use tracing::debug;

pub use scale::SqrtScale;

use crate::constants::GROUP_SIZE_THRESHOLD;
use crate::model::AddressNode;
use crate::model::FlowLink;
use crate::model::GraphFilter;
use crate::model::NodeKind;
use crate::model::Transaction;
use crate::store::SeedAddressSet;
use crate::utils::normalize_address;

/// Renderable output of one build pass. Regenerated wholesale on every
/// relevant state change; simulation state is carried separately by the
/// layout engine.
#[derive(Debug, Clone, Serialize)]
pub struct GraphView {
    pub nodes: Vec<AddressNode>,
    pub links: Vec<FlowLink>,
    pub radius_scale: SqrtScale,
}

impl GraphView {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            links: Vec::new(),
            radius_scale: SqrtScale::default(),
        }
    }
}

/// Node payload of the aggregation graph. Keyed case-insensitively; the
/// first-seen casing is kept for display.
#[derive(Debug, Clone)]
struct FlowNode {
    address: String,
    balance: f64,
}

#[derive(Debug, Clone)]
struct LinkAgg {
    value: f64,
    count: usize,
}

/// Arena-indexed aggregation graph: petgraph nodes in first-seen order
/// plus an address -> index map.
#[derive(Debug, Default)]
struct FlowGraph {
    graph: DiGraph<FlowNode, LinkAgg>,
    node_indices: HashMap<String, NodeIndex>,
}

impl FlowGraph {
    fn intern(
        &mut self,
        address: &str,
    ) -> NodeIndex {
        let key = normalize_address(address);
        if let Some(&idx) = self.node_indices.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(FlowNode {
            address: address.to_string(),
            balance: 0.0,
        });
        self.node_indices.insert(key, idx);
        idx
    }

    fn record(
        &mut self,
        tx: &Transaction,
    ) {
        let from_idx = self.intern(&tx.from);
        let to_idx = self.intern(&tx.to);

        // Both endpoints accumulate the full value: gross flow, not net
        // balance. Self-transfers therefore count twice.
        self.graph[from_idx].balance += tx.value;
        self.graph[to_idx].balance += tx.value;

        match self.graph.find_edge(from_idx, to_idx) {
            Some(edge) => {
                let agg = &mut self.graph[edge];
                agg.value += tx.value;
                agg.count += 1;
            },
            None => {
                self.graph.add_edge(from_idx, to_idx, LinkAgg { value: tx.value, count: 1 });
            },
        }
    }
}

/// Build the renderable graph from the full transaction set: filter,
/// aggregate, hop-label, cluster, optionally prune, scale. Pure and
/// total: bad input degrades to an empty view, it never panics.
pub fn build_graph(
    transactions: &[Transaction],
    filter: &GraphFilter,
    seeds: &SeedAddressSet,
) -> GraphView {
    let mut flow = FlowGraph::default();
    for tx in transactions.iter().filter(|tx| filter.accepts(tx)) {
        flow.record(tx);
    }

    if flow.graph.node_count() == 0 {
        return GraphView::empty();
    }

    let graph = &flow.graph;
    let hops = bfs::hop_distances(graph, seeds, |n: &FlowNode| n.address.as_str());
    let clusters = cluster::assign_clusters(graph, GROUP_SIZE_THRESHOLD);

    let retained: HashSet<NodeIndex> = graph
        .node_indices()
        .filter(|&idx| {
            if !filter.related_only {
                return true;
            }
            survives_pruning(graph, idx, &hops)
        })
        .collect();

    let nodes: Vec<AddressNode> = graph
        .node_indices()
        .filter(|idx| retained.contains(idx))
        .map(|idx| {
            let payload = &graph[idx];
            let assignment = &clusters[idx.index()];
            AddressNode {
                id: payload.address.clone(),
                balance: payload.balance,
                kind: NodeKind::classify(&payload.address),
                group_id: assignment.group_id,
                group_size: assignment.group_size,
                group_color: assignment.color.clone(),
                hop: hops.get(&idx).copied(),
            }
        })
        .collect();

    let links: Vec<FlowLink> = graph
        .edge_references()
        .filter(|edge| retained.contains(&edge.source()) && retained.contains(&edge.target()))
        .map(|edge| FlowLink {
            source: graph[edge.source()].address.clone(),
            target: graph[edge.target()].address.clone(),
            value: edge.weight().value,
            count: edge.weight().count,
            bidirectional: graph.find_edge(edge.target(), edge.source()).is_some(),
        })
        .collect();

    let radius_scale = SqrtScale::from_balances(nodes.iter().map(|n| n.balance));

    debug!(
        "graph_build::nodes::{}::links::{}::pruned::{}",
        nodes.len(),
        links.len(),
        graph.node_count() - nodes.len()
    );

    GraphView {
        nodes,
        links,
        radius_scale,
    }
}

/// Cross-address relationship rule: keep seeds, keep anything two or more
/// hops out, and keep hop-1 nodes only when they bridge toward a deeper
/// node instead of dead-ending off a seed. Unreachable nodes never
/// survive.
fn survives_pruning<E>(
    graph: &DiGraph<FlowNode, E>,
    idx: NodeIndex,
    hops: &HashMap<NodeIndex, u32>,
) -> bool {
    match hops.get(&idx) {
        None => false,
        Some(0) => true,
        Some(h) if *h >= 2 => true,
        Some(_) => graph
            .neighbors_undirected(idx)
            .any(|neighbor| hops.get(&neighbor).is_some_and(|h| *h > 0)),
    }
}
