use std::collections::BTreeMap;

use crate::model::AddressNode;
use crate::store::SeedAddressSet;
use crate::store::VisitedSet;

/// Candidates for the next trace run: nodes anchored to the known graph
/// (defined hop, or present in the seed set) that have not been queried
/// yet. Sorted deepest-first so default selection targets the frontier
/// edge of the known graph.
pub fn eligible_candidates<'a>(
    nodes: &'a [AddressNode],
    seeds: &SeedAddressSet,
    visited: &VisitedSet,
) -> Vec<&'a AddressNode> {
    let mut pool: Vec<&AddressNode> = nodes
        .iter()
        .filter(|n| n.hop.is_some() || seeds.contains(&n.id))
        .filter(|n| !visited.contains(&n.id))
        .collect();
    pool.sort_by(|a, b| b.hop.unwrap_or(0).cmp(&a.hop.unwrap_or(0)));
    pool
}

#[derive(Debug)]
pub struct HopGroup<'a> {
    pub hop: u32,
    pub label: String,
    pub nodes: Vec<&'a AddressNode>,
}

/// Candidates bucketed by hop level, ascending, with display labels.
pub fn group_by_hop<'a>(candidates: &[&'a AddressNode]) -> Vec<HopGroup<'a>> {
    let mut groups: BTreeMap<u32, Vec<&AddressNode>> = BTreeMap::new();
    for node in candidates {
        groups.entry(node.hop.unwrap_or(0)).or_default().push(node);
    }
    groups
        .into_iter()
        .map(|(hop, nodes)| HopGroup {
            hop,
            label: if hop == 0 { "Base (0)".to_string() } else { format!("Hop {}", hop) },
            nodes,
        })
        .collect()
}

/// Default target selection: every un-visited node sitting at the current
/// maximum hop depth.
pub fn auto_select_targets(
    nodes: &[AddressNode],
    visited: &VisitedSet,
) -> Vec<String> {
    let max_hop = nodes
        .iter()
        .filter(|n| !visited.contains(&n.id))
        .filter_map(|n| n.hop)
        .max();

    let Some(max_hop) = max_hop else {
        return Vec::new();
    };

    nodes
        .iter()
        .filter(|n| n.hop == Some(max_hop) && !visited.contains(&n.id))
        .map(|n| n.id.clone())
        .collect()
}
