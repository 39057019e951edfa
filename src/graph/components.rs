// src/graph/components.rs
//! Connectivity queries: components, largest component, induced edges.
//!
//! Components are recomputed from scratch on every call, so they stay correct
//! across arbitrary `remove_edge` / `restore_edge` sequences.
//!
//! Tie-break for the largest component: components are scanned in ascending
//! order of their smallest vertex id and the first one of maximum size wins.

use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::model::{Edge, Graph};
use super::union_find::UnionFind;

/// Maximal connected vertex sets, ordered by smallest vertex id.
#[must_use]
pub fn connected_components(graph: &Graph) -> Vec<BTreeSet<u64>> {
    let slots: BTreeMap<u64, usize> = graph
        .vertices()
        .enumerate()
        .map(|(slot, vertex)| (vertex, slot))
        .collect();
    let ids: Vec<u64> = slots.keys().copied().collect();

    let mut uf = UnionFind::new(ids.len());
    for edge in graph.edges() {
        if let (Some(&a), Some(&b)) = (slots.get(&edge.src), slots.get(&edge.dst)) {
            uf.union(a, b);
        }
    }

    let components: Vec<BTreeSet<u64>> = uf
        .groups()
        .into_iter()
        .map(|group| group.into_iter().filter_map(|slot| ids.get(slot).copied()).collect())
        .collect();
    trace!(count = components.len(), "connected components");
    components
}

/// Number of connected components.
#[must_use]
pub fn component_count(graph: &Graph) -> usize {
    connected_components(graph).len()
}

/// The largest component; empty for a graph without edges.
#[must_use]
pub fn largest_component(graph: &Graph) -> BTreeSet<u64> {
    let components = connected_components(graph);
    pick_largest(&components).cloned().unwrap_or_default()
}

/// First component of maximum size in the given order.
pub(crate) fn pick_largest(components: &[BTreeSet<u64>]) -> Option<&BTreeSet<u64>> {
    let mut best: Option<&BTreeSet<u64>> = None;
    for component in components {
        if best.map_or(true, |b| component.len() > b.len()) {
            best = Some(component);
        }
    }
    best
}

/// Edges with both endpoints in `vertices`, ascending by insertion index.
#[must_use]
pub fn induced_edges(graph: &Graph, vertices: &BTreeSet<u64>) -> Vec<Edge> {
    // `Graph::edges` already yields insertion order.
    graph
        .edges()
        .filter(|e| vertices.contains(&e.src) && vertices.contains(&e.dst))
        .copied()
        .collect()
}

#[must_use]
pub fn is_single_component(graph: &Graph) -> bool {
    largest_component(graph).len() == graph.vertex_count()
}
