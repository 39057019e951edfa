// src/graph/model.rs
//! Undirected multigraph built from link records.

use std::collections::BTreeMap;

use tracing::trace;

use crate::link::LinkRecord;

/// One stored interaction. `index` is its insertion position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub src: u64,
    pub dst: u64,
    pub weight: f64,
    pub index: usize,
}

impl Edge {
    /// The edge as a `REAL` record in its stored orientation.
    #[must_use]
    pub fn to_record(&self) -> LinkRecord {
        LinkRecord::real(self.src, self.dst, self.weight)
    }
}

/// Parallel edges are kept as separate insertions; nothing is merged.
///
/// The vertex set is the set of endpoints of the edges currently present:
/// removing the last edge of a vertex removes the vertex, restoring the edge
/// brings it back.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    edges: BTreeMap<usize, Edge>,
    incidence: BTreeMap<u64, usize>,
    next_index: usize,
}

impl Graph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph with one edge per record, indexed from 0 in input order.
    #[must_use]
    pub fn build(records: &[LinkRecord]) -> Self {
        let mut graph = Self::new();
        for record in records {
            graph.add_edge(record.src, record.dst, record.weight);
        }
        trace!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            "graph built"
        );
        graph
    }

    /// Appends an edge and returns its insertion index.
    pub fn add_edge(&mut self, src: u64, dst: u64, weight: f64) -> usize {
        let index = self.next_index;
        self.next_index += 1;
        self.insert(Edge {
            src,
            dst,
            weight,
            index,
        });
        index
    }

    /// Removes the edge with insertion index `index`, if present.
    pub fn remove_edge(&mut self, index: usize) -> Option<Edge> {
        let edge = self.edges.remove(&index)?;
        self.release(edge.src);
        self.release(edge.dst);
        Some(edge)
    }

    /// Puts back an edge previously taken out with [`Graph::remove_edge`],
    /// keeping its original index.
    pub fn restore_edge(&mut self, edge: Edge) {
        self.next_index = self.next_index.max(edge.index + 1);
        self.insert(edge);
    }

    fn insert(&mut self, edge: Edge) {
        *self.incidence.entry(edge.src).or_default() += 1;
        *self.incidence.entry(edge.dst).or_default() += 1;
        self.edges.insert(edge.index, edge);
    }

    fn release(&mut self, vertex: u64) {
        if let Some(count) = self.incidence.get_mut(&vertex) {
            *count -= 1;
            if *count == 0 {
                self.incidence.remove(&vertex);
            }
        }
    }

    /// Vertices in ascending id order.
    pub fn vertices(&self) -> impl Iterator<Item = u64> + '_ {
        self.incidence.keys().copied()
    }

    /// Edges in ascending insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    #[cfg(test)]
    pub(crate) fn contains_vertex(&self, vertex: u64) -> bool {
        self.incidence.contains_key(&vertex)
    }

    #[cfg(test)]
    pub(crate) fn edge(&self, index: usize) -> Option<&Edge> {
        self.edges.get(&index)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.incidence.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
