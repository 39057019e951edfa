// src/split/policy.rs
//! Edge-selection strategies for train/test splitting.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};
use crate::graph::{self, Graph};
use crate::link::LinkRecord;

/// Decides which edges a split may hold out.
///
/// The split loop visits candidates in `visit_order`, removes each one from
/// the working graph, and keeps the removal only if `accepts` approves the
/// resulting graph.
pub trait HoldoutPolicy {
    fn name(&self) -> &'static str;

    /// Indices into the input records, in the order they are tried.
    fn visit_order(&self, records: &[LinkRecord]) -> Vec<usize>;

    /// Whether the graph left after a tentative removal is acceptable.
    fn accepts(&self, graph: &Graph) -> bool;
}

/// Most recent edges first; a removal is kept only if the training graph
/// stays one connected component with at least one edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReverseChronological;

impl HoldoutPolicy for ReverseChronological {
    fn name(&self) -> &'static str {
        "prediction"
    }

    fn visit_order(&self, records: &[LinkRecord]) -> Vec<usize> {
        (0..records.len()).rev().collect()
    }

    fn accepts(&self, graph: &Graph) -> bool {
        !graph.is_empty() && graph::is_single_component(graph)
    }
}

/// Named split policies selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningKind {
    Detection,
    Prediction,
}

impl MiningKind {
    /// Resolves the built-in policy for this mining kind.
    ///
    /// # Errors
    /// Returns `UnsupportedPolicy` for `Detection`, which has no built-in
    /// acceptance rule; pass a custom [`HoldoutPolicy`] to
    /// [`split_with`](super::split_with) instead.
    pub fn policy(self) -> Result<Box<dyn HoldoutPolicy>> {
        match self {
            MiningKind::Prediction => Ok(Box::new(ReverseChronological)),
            MiningKind::Detection => Err(LinkError::UnsupportedPolicy(
                "detection has no built-in edge-acceptance rule".to_string(),
            )),
        }
    }
}

impl fmt::Display for MiningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningKind::Detection => f.write_str("detection"),
            MiningKind::Prediction => f.write_str("prediction"),
        }
    }
}
