// src/eval/sets.rs
//! Candidate link sets derived from dataset, train and test records.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::link::{LinkRecord, Pair};

/// Everything AUC needs, derived once per `(dataset, train, test)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationSets {
    /// Endpoints of every training record.
    pub train_nodes: BTreeSet<u64>,
    /// Canonical pairs of every dataset record.
    pub dataset_edges: BTreeSet<Pair>,
    /// Held-out pairs with both endpoints known to training, ascending.
    pub missing: Vec<Pair>,
    /// Training-node pairs never linked in the dataset, ascending.
    pub nonexistent: Vec<Pair>,
}

impl EvaluationSets {
    /// Enumerates every pair of training nodes, so this is quadratic in
    /// `train_nodes`.
    #[must_use]
    pub fn build(dataset: &[LinkRecord], train: &[LinkRecord], test: &[LinkRecord]) -> Self {
        let train_nodes = node_set(train);
        let dataset_edges: BTreeSet<Pair> = dataset.iter().filter_map(Pair::of).collect();
        let missing = known_pairs(&train_nodes, test).into_iter().collect();

        let nodes: Vec<u64> = train_nodes.iter().copied().collect();
        let mut nonexistent = Vec::new();
        for (i, &u) in nodes.iter().enumerate() {
            for &v in nodes.iter().skip(i + 1) {
                let pair = Pair { lo: u, hi: v };
                if !dataset_edges.contains(&pair) {
                    nonexistent.push(pair);
                }
            }
        }

        let sets = Self {
            train_nodes,
            dataset_edges,
            missing,
            nonexistent,
        };
        debug!(
            train_nodes = sets.train_nodes.len(),
            dataset_edges = sets.dataset_edges.len(),
            missing = sets.missing.len(),
            nonexistent = sets.nonexistent.len(),
            "evaluation sets built"
        );
        sets
    }

    /// Number of `(missing, nonexistent)` comparisons AUC will attempt.
    #[must_use]
    pub fn comparisons(&self) -> usize {
        self.missing.len().saturating_mul(self.nonexistent.len())
    }
}

/// Held-out pairs whose endpoints both appear in training; the Precision
/// denominator. Needs no pair enumeration.
#[must_use]
pub fn detectable_links(train: &[LinkRecord], test: &[LinkRecord]) -> BTreeSet<Pair> {
    known_pairs(&node_set(train), test)
}

fn node_set(records: &[LinkRecord]) -> BTreeSet<u64> {
    records.iter().flat_map(|r| [r.src, r.dst]).collect()
}

fn known_pairs(nodes: &BTreeSet<u64>, records: &[LinkRecord]) -> BTreeSet<Pair> {
    records
        .iter()
        .filter_map(Pair::of)
        .filter(|p| nodes.contains(&p.lo) && nodes.contains(&p.hi))
        .collect()
}
