use std::collections::HashMap;
use std::f64::consts::PI;

use petgraph::graph::DiGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;

use crate::constants::DEFAULT_GROUP_COLOR;
use crate::constants::GOLDEN_RATIO;

/// Per-node cluster assignment, indexed by `NodeIndex::index()`.
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    pub group_id: usize,
    pub group_size: usize,
    pub color: String,
}

/// Union-find over link endpoints; nodes without links stay singleton
/// components. Components larger than `threshold` receive a distinct color
/// from a golden-ratio hue walk so adjacent large clusters stay visually
/// separable; everything else gets the flat default. Deterministic for a
/// fixed node/edge insertion order.
pub fn assign_clusters<N, E>(
    graph: &DiGraph<N, E>,
    threshold: usize,
) -> Vec<ClusterAssignment> {
    let mut uf: UnionFind<usize> = UnionFind::new(graph.node_count());
    for edge in graph.edge_references() {
        uf.union(edge.source().index(), edge.target().index());
    }

    let mut component_sizes: HashMap<usize, usize> = HashMap::new();
    for idx in graph.node_indices() {
        let root = uf.find(idx.index());
        *component_sizes.entry(root).or_insert(0) += 1;
    }

    let mut root_groups: HashMap<usize, (usize, String)> = HashMap::new();
    let mut hue = 0.0_f64;
    let mut next_group_id = 0_usize;

    graph
        .node_indices()
        .map(|idx| {
            let root = uf.find(idx.index());
            let group_size = component_sizes[&root];

            if group_size > threshold {
                let (group_id, color) = root_groups
                    .entry(root)
                    .or_insert_with(|| {
                        hue = (hue + GOLDEN_RATIO) % 1.0;
                        next_group_id += 1;
                        (next_group_id, sinebow(hue))
                    })
                    .clone();
                ClusterAssignment {
                    group_id,
                    group_size,
                    color,
                }
            } else {
                ClusterAssignment {
                    group_id: 0,
                    group_size,
                    color: DEFAULT_GROUP_COLOR.to_string(),
                }
            }
        })
        .collect()
}

/// Cyclic rainbow interpolation (sinebow): smooth, period-1 hue mapping
/// with even perceptual spacing between neighboring samples.
pub fn sinebow(t: f64) -> String {
    let t = (0.5 - t) * PI;
    let channel = |phase: f64| {
        let s = (t + phase).sin();
        (255.0 * s * s).round().clamp(0.0, 255.0) as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(0.0), channel(PI / 3.0), channel(2.0 * PI / 3.0))
}
