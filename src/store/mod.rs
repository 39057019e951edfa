// src/store/mod.rs
//! Score store: real interactions and per-metric predicted weights.
//!
//! Pairs are undirected. Every operation canonicalizes `(u, v)` first, so
//! lookups match either orientation. Self-loops are never stored.

pub mod file;
pub mod memory;
pub mod sync;

pub use file::{with_store, FileStore};
pub use memory::MemoryStore;
pub use sync::{
    check_dataset, clear_store, save_dataset, wait_stability, CheckOutcome, SaveOutcome,
    StabilityOutcome,
};

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};
use crate::link::{LinkKind, MetricKind, Pair};

/// How a `REAL` put combines with the weight already stored for that pair.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Aggregation {
    #[default]
    Overwrite,
    RunningAverage,
    /// Weight given to the incoming observation, in `[0, 1]`.
    Ewma(f64),
}

impl Aggregation {
    /// Folds `incoming` into `previous` (`(weight, count)`).
    ///
    /// The first observation of a pair stores `incoming` with count 1 under
    /// every policy.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn apply(self, previous: Option<(f64, u64)>, incoming: f64) -> (f64, u64) {
        let Some((old, count)) = previous else {
            return (incoming, 1);
        };
        let weight = match self {
            Aggregation::Overwrite => incoming,
            Aggregation::RunningAverage => {
                (old * count as f64 + incoming) / (count as f64 + 1.0)
            }
            Aggregation::Ewma(factor) => incoming * factor + old * (1.0 - factor),
        };
        (weight, count.saturating_add(1))
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Overwrite => f.write_str("overwrite"),
            Aggregation::RunningAverage => f.write_str("average"),
            Aggregation::Ewma(factor) => write!(f, "ewma({factor})"),
        }
    }
}

/// Aggregation selector as it appears in config files and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    Overwrite,
    #[default]
    Average,
    Ewma,
}

impl AggregationMode {
    /// Resolves the mode into a policy; `factor` only matters for `Ewma`.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if `Ewma` is selected with a factor outside
    /// `[0, 1]`.
    pub fn resolve(self, factor: f64) -> Result<Aggregation> {
        match self {
            AggregationMode::Overwrite => Ok(Aggregation::Overwrite),
            AggregationMode::Average => Ok(Aggregation::RunningAverage),
            AggregationMode::Ewma if (0.0..=1.0).contains(&factor) => Ok(Aggregation::Ewma(factor)),
            AggregationMode::Ewma => Err(LinkError::InvalidParameter(format!(
                "ewma factor must be in [0, 1], got {factor}"
            ))),
        }
    }
}

/// One `top_k` entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredPair {
    pub pair: Pair,
    pub score: f64,
}

/// Operations the evaluation engine and maintenance commands need from a
/// score store.
///
/// Reads take `&self` so one store can be shared by parallel evaluation
/// workers.
pub trait ScoreStore {
    /// Predicted score of `(u, v)` under `metric`, if one is stored.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the backend cannot be read.
    fn score(&self, metric: MetricKind, u: u64, v: u64) -> Result<Option<f64>>;

    /// Up to `k` pairs with the highest `metric` score, descending.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the backend cannot be read.
    fn top_k(&self, metric: MetricKind, k: usize) -> Result<Vec<ScoredPair>>;

    /// Exact match on kind, pair and weight.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the backend cannot be read.
    fn exists(&self, kind: LinkKind, u: u64, v: u64, weight: f64) -> Result<bool>;

    /// All stored entries, real and mined.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the backend cannot be read.
    fn count_edges(&self) -> Result<usize>;

    /// Stores a weight. Aggregation applies to `REAL` puts only; mined puts
    /// always overwrite.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for a self-loop.
    fn put(&mut self, kind: LinkKind, u: u64, v: u64, weight: f64, policy: Aggregation)
        -> Result<()>;

    /// Deletes the entry for `(u, v)` of `kind`; returns whether one existed.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if the backend cannot be written.
    fn remove(&mut self, u: u64, v: u64, kind: LinkKind) -> Result<bool>;

    /// # Errors
    /// Returns `StoreUnavailable` if the backend cannot be written.
    fn clear_all(&mut self) -> Result<()>;
}

/// Canonical pair for a store key, rejecting self-loops.
pub(crate) fn store_key(u: u64, v: u64) -> Result<Pair> {
    Pair::canonical(u, v)
        .ok_or_else(|| LinkError::InvalidParameter(format!("self-loop ({u},{v}) cannot be stored")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_is_stored_verbatim() {
        for policy in [
            Aggregation::Overwrite,
            Aggregation::RunningAverage,
            Aggregation::Ewma(0.25),
        ] {
            assert_eq!(policy.apply(None, 7.0), (7.0, 1));
        }
    }

    #[test]
    fn running_average_and_ewma() {
        let (avg, count) = Aggregation::RunningAverage.apply(Some((2.0, 1)), 4.0);
        assert!((avg - 3.0).abs() < 1e-12);
        assert_eq!(count, 2);

        let (ewma, _) = Aggregation::Ewma(0.25).apply(Some((2.0, 1)), 4.0);
        assert!((ewma - 2.5).abs() < 1e-12);

        let (over, count) = Aggregation::Overwrite.apply(Some((2.0, 5)), 4.0);
        assert!((over - 4.0).abs() < 1e-12);
        assert_eq!(count, 6);
    }

    #[test]
    fn ewma_factor_is_range_checked() {
        assert!(AggregationMode::Ewma.resolve(0.0).is_ok());
        assert!(AggregationMode::Ewma.resolve(1.0).is_ok());
        assert!(matches!(
            AggregationMode::Ewma.resolve(1.5),
            Err(LinkError::InvalidParameter(_))
        ));
        assert_eq!(
            AggregationMode::Average.resolve(9.0).ok(),
            Some(Aggregation::RunningAverage)
        );
    }
}
