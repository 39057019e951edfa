// src/split/mod.rs
//! Connectivity-preserving train/test splits.
//!
//! Deterministic for a given `(records, ratio, policy)`: no randomness is
//! involved. Each tentative removal triggers a full connectivity recomputation,
//! so a split costs `O(E * (V + E))`.

pub mod policy;

pub use policy::{HoldoutPolicy, MiningKind, ReverseChronological};

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{LinkError, Result};
use crate::graph::Graph;
use crate::link::LinkRecord;

/// Disjoint training and held-out records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Split {
    /// Kept records, in input order.
    pub train: Vec<LinkRecord>,
    /// Held-out records, in the order they were committed.
    pub test: Vec<LinkRecord>,
    /// Number of edges the ratio asked for.
    pub target: usize,
}

impl Split {
    /// True if fewer edges were held out than requested.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.test.len() < self.target
    }
}

/// Splits with the `prediction` policy (reverse-chronological greedy).
///
/// # Errors
/// Returns `InvalidParameter` if `ratio` is not in `(0, 1)`.
pub fn split(records: &[LinkRecord], ratio: f64) -> Result<Split> {
    split_with(&ReverseChronological, records, ratio)
}

/// Number of edges to hold out: `round(ratio * len)`.
///
/// # Errors
/// Returns `InvalidParameter` if `ratio` is not a finite value in `(0, 1)`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn holdout_target(len: usize, ratio: f64) -> Result<usize> {
    if !ratio.is_finite() || ratio <= 0.0 || ratio >= 1.0 {
        return Err(LinkError::InvalidParameter(format!(
            "test ratio must be in (0, 1), got {ratio}"
        )));
    }
    Ok((ratio * len as f64).round() as usize)
}

/// Runs the split loop with an arbitrary policy.
///
/// # Errors
/// Returns `InvalidParameter` if `ratio` is not in `(0, 1)`.
pub fn split_with<P>(policy: &P, records: &[LinkRecord], ratio: f64) -> Result<Split>
where
    P: HoldoutPolicy + ?Sized,
{
    let target = holdout_target(records.len(), ratio)?;
    // Record i is edge i: `Graph::build` indexes from 0 in input order.
    let mut graph = Graph::build(records);
    let mut held_out = vec![false; records.len()];
    let mut committed: Vec<usize> = Vec::with_capacity(target);

    for idx in policy.visit_order(records) {
        if committed.len() >= target {
            break;
        }
        let Some(edge) = graph.remove_edge(idx) else {
            continue;
        };
        if policy.accepts(&graph) {
            if let Some(slot) = held_out.get_mut(idx) {
                *slot = true;
            }
            committed.push(idx);
            trace!(index = idx, removed = committed.len(), target, "held out");
        } else {
            graph.restore_edge(edge);
            trace!(index = idx, "cut edge, kept in training set");
        }
    }

    let train = records
        .iter()
        .zip(&held_out)
        .filter(|(_, &out)| !out)
        .map(|(r, _)| *r)
        .collect();
    let test = committed
        .iter()
        .filter_map(|&idx| records.get(idx).copied())
        .collect();

    let split = Split {
        train,
        test,
        target,
    };
    debug!(
        policy = policy.name(),
        train = split.train.len(),
        test = split.test.len(),
        target,
        "split generated"
    );
    Ok(split)
}
