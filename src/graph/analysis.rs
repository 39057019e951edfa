// src/graph/analysis.rs
//! Read-only dataset summary and LCC extraction.

use std::collections::BTreeSet;

use serde::Serialize;

use super::components::{connected_components, induced_edges, largest_component, pick_largest};
use super::model::Graph;
use crate::link::LinkRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphAnalysis {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub component_count: usize,
    pub lcc_node_count: usize,
    pub lcc_edge_count: usize,
}

#[must_use]
pub fn analyze(graph: &Graph) -> GraphAnalysis {
    let components = connected_components(graph);
    let lcc = pick_largest(&components);
    let lcc_edge_count = lcc.map_or(0, |set| induced_edges(graph, set).len());

    GraphAnalysis {
        num_nodes: graph.vertex_count(),
        num_edges: graph.edge_count(),
        component_count: components.len(),
        lcc_node_count: lcc.map_or(0, BTreeSet::len),
        lcc_edge_count,
    }
}

/// The LCC's edges as `REAL` records, in insertion order.
#[must_use]
pub fn lcc_records(graph: &Graph) -> Vec<LinkRecord> {
    let lcc = largest_component(graph);
    induced_edges(graph, &lcc).iter().map(|e| e.to_record()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(pairs: &[(u64, u64)]) -> Vec<LinkRecord> {
        pairs
            .iter()
            .map(|&(u, v)| LinkRecord::real(u, v, 1.0))
            .collect()
    }

    #[test]
    fn analysis_counts_parallel_edges() {
        let graph = Graph::build(&records(&[(1, 2), (2, 1), (2, 3), (7, 8)]));
        let report = analyze(&graph);
        assert_eq!(
            report,
            GraphAnalysis {
                num_nodes: 5,
                num_edges: 4,
                component_count: 2,
                lcc_node_count: 3,
                lcc_edge_count: 3,
            }
        );
    }

    #[test]
    fn lcc_extraction_is_idempotent() {
        let graph = Graph::build(&records(&[(1, 2), (9, 8), (2, 3), (3, 1), (8, 7)]));
        let first = lcc_records(&graph);
        let again = Graph::build(&first);
        assert_eq!(lcc_records(&again), first);
        assert_eq!(largest_component(&again), largest_component(&graph));
    }

    #[test]
    fn empty_graph_reports_zeroes() {
        let report = analyze(&Graph::new());
        assert_eq!(report.num_nodes, 0);
        assert_eq!(report.lcc_node_count, 0);
        assert_eq!(report.lcc_edge_count, 0);
    }
}
