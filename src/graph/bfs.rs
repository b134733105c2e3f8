use std::collections::HashMap;
use std::collections::VecDeque;

use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;

use crate::store::SeedAddressSet;

/// Multi-source breadth-first hop labeling over the undirected view of the
/// flow graph. Every node whose address matches a seed (case-insensitive)
/// roots the search at hop 0; each node gets the hop of its first visit,
/// which BFS guarantees is the minimum. Unreached nodes are absent from
/// the result.
pub fn hop_distances<N, E>(
    graph: &DiGraph<N, E>,
    seeds: &SeedAddressSet,
    address_of: impl Fn(&N) -> &str,
) -> HashMap<NodeIndex, u32> {
    let mut hops: HashMap<NodeIndex, u32> = HashMap::new();
    let mut queue: VecDeque<NodeIndex> = VecDeque::new();

    for idx in graph.node_indices() {
        if seeds.contains(address_of(&graph[idx])) {
            hops.insert(idx, 0);
            queue.push_back(idx);
        }
    }

    while let Some(idx) = queue.pop_front() {
        let level = hops[&idx];
        for neighbor in graph.neighbors_undirected(idx) {
            if !hops.contains_key(&neighbor) {
                hops.insert(neighbor, level + 1);
                queue.push_back(neighbor);
            }
        }
    }

    hops
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_graph(edges: &[(&str, &str)]) -> DiGraph<String, ()> {
        let mut g = DiGraph::new();
        let mut indices = HashMap::new();
        for (a, b) in edges {
            let ai = *indices.entry(a.to_string()).or_insert_with(|| g.add_node(a.to_string()));
            let bi = *indices.entry(b.to_string()).or_insert_with(|| g.add_node(b.to_string()));
            g.add_edge(ai, bi, ());
        }
        g
    }

    fn seeds_of(addresses: &[&str]) -> SeedAddressSet {
        let mut seeds = SeedAddressSet::new();
        seeds.add_many(addresses.iter().copied());
        seeds
    }

    #[test]
    fn chain_hops_count_from_seed() {
        let g = labeled_graph(&[("a", "b"), ("b", "c")]);
        let hops = hop_distances(&g, &seeds_of(&["a"]), |n| n.as_str());
        let by_name: HashMap<&str, u32> =
            g.node_indices().filter_map(|i| hops.get(&i).map(|h| (g[i].as_str(), *h))).collect();
        assert_eq!(by_name["a"], 0);
        assert_eq!(by_name["b"], 1);
        assert_eq!(by_name["c"], 2);
    }

    #[test]
    fn traversal_ignores_edge_direction() {
        // c -> b -> a with seed a still reaches c at hop 2.
        let g = labeled_graph(&[("c", "b"), ("b", "a")]);
        let hops = hop_distances(&g, &seeds_of(&["a"]), |n| n.as_str());
        assert_eq!(hops.len(), 3);
    }

    #[test]
    fn disconnected_nodes_stay_unlabeled() {
        let g = labeled_graph(&[("a", "b"), ("x", "y")]);
        let hops = hop_distances(&g, &seeds_of(&["a"]), |n| n.as_str());
        assert_eq!(hops.len(), 2);
    }

    #[test]
    fn seed_matching_is_case_insensitive() {
        let g = labeled_graph(&[("0xABC", "0xdef")]);
        let hops = hop_distances(&g, &seeds_of(&["0xabc"]), |n| n.as_str());
        assert_eq!(hops.len(), 2);
    }

    #[test]
    fn absent_seed_roots_nothing() {
        let g = labeled_graph(&[("a", "b")]);
        let hops = hop_distances(&g, &seeds_of(&["zzz"]), |n| n.as_str());
        assert!(hops.is_empty());
    }
}
