// src/store/memory.rs
//! In-process score store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{store_key, Aggregation, ScoreStore, ScoredPair};
use crate::error::{LinkError, Result};
use crate::link::{LinkKind, MetricKind, Pair};

#[derive(Debug, Clone, Copy, PartialEq)]
struct RealEntry {
    weight: f64,
    count: u64,
}

/// Keeps real interactions (with their observation count) apart from mined
/// scores, which are grouped per metric.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
    real: BTreeMap<Pair, RealEntry>,
    mined: BTreeMap<MetricKind, BTreeMap<Pair, f64>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Weight and observation count of a real interaction.
    #[must_use]
    pub fn real_entry(&self, u: u64, v: u64) -> Option<(f64, u64)> {
        let pair = Pair::canonical(u, v)?;
        self.real.get(&pair).map(|e| (e.weight, e.count))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.real.is_empty() && self.mined.values().all(BTreeMap::is_empty)
    }

    /// Flattens the store into a serializable form.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let real = self
            .real
            .iter()
            .map(|(pair, entry)| RealRow {
                lo: pair.lo,
                hi: pair.hi,
                weight: entry.weight,
                count: entry.count,
            })
            .collect();
        let mined = self
            .mined
            .iter()
            .flat_map(|(&metric, scores)| {
                scores.iter().map(move |(pair, &score)| MinedRow {
                    metric,
                    lo: pair.lo,
                    hi: pair.hi,
                    score,
                })
            })
            .collect();
        Snapshot { real, mined }
    }

    /// Rebuilds a store from a snapshot.
    ///
    /// # Errors
    /// Returns `StoreUnavailable` if a row holds a self-loop or a zero count.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut store = Self::new();
        for row in snapshot.real {
            let pair = row_key(row.lo, row.hi)?;
            if row.count == 0 {
                return Err(LinkError::StoreUnavailable(format!(
                    "snapshot row {pair} has zero observations"
                )));
            }
            store.real.insert(
                pair,
                RealEntry {
                    weight: row.weight,
                    count: row.count,
                },
            );
        }
        for row in snapshot.mined {
            let pair = row_key(row.lo, row.hi)?;
            store.mined.entry(row.metric).or_default().insert(pair, row.score);
        }
        Ok(store)
    }
}

fn row_key(lo: u64, hi: u64) -> Result<Pair> {
    Pair::canonical(lo, hi)
        .ok_or_else(|| LinkError::StoreUnavailable(format!("snapshot holds self-loop ({lo},{hi})")))
}

/// Serialized store contents. JSON object keys must be strings, so entries
/// are kept as row lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub real: Vec<RealRow>,
    #[serde(default)]
    pub mined: Vec<MinedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealRow {
    pub lo: u64,
    pub hi: u64,
    pub weight: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinedRow {
    pub metric: MetricKind,
    pub lo: u64,
    pub hi: u64,
    pub score: f64,
}

impl ScoreStore for MemoryStore {
    fn score(&self, metric: MetricKind, u: u64, v: u64) -> Result<Option<f64>> {
        let Some(pair) = Pair::canonical(u, v) else {
            return Ok(None);
        };
        Ok(self
            .mined
            .get(&metric)
            .and_then(|scores| scores.get(&pair))
            .copied())
    }

    fn top_k(&self, metric: MetricKind, k: usize) -> Result<Vec<ScoredPair>> {
        let Some(scores) = self.mined.get(&metric) else {
            return Ok(Vec::new());
        };
        let mut ranked: Vec<ScoredPair> = scores
            .iter()
            .map(|(&pair, &score)| ScoredPair { pair, score })
            .collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.pair.cmp(&b.pair)));
        ranked.truncate(k);
        Ok(ranked)
    }

    #[allow(clippy::float_cmp)]
    fn exists(&self, kind: LinkKind, u: u64, v: u64, weight: f64) -> Result<bool> {
        let Some(pair) = Pair::canonical(u, v) else {
            return Ok(false);
        };
        Ok(match kind {
            LinkKind::Real => self.real.get(&pair).is_some_and(|e| e.weight == weight),
            LinkKind::Mined(metric) => self
                .mined
                .get(&metric)
                .and_then(|scores| scores.get(&pair))
                .is_some_and(|&score| score == weight),
        })
    }

    fn count_edges(&self) -> Result<usize> {
        Ok(self.real.len() + self.mined.values().map(BTreeMap::len).sum::<usize>())
    }

    fn put(
        &mut self,
        kind: LinkKind,
        u: u64,
        v: u64,
        weight: f64,
        policy: Aggregation,
    ) -> Result<()> {
        let pair = store_key(u, v)?;
        match kind {
            LinkKind::Real => {
                let previous = self.real.get(&pair).map(|e| (e.weight, e.count));
                let (weight, count) = policy.apply(previous, weight);
                self.real.insert(pair, RealEntry { weight, count });
                // A confirmed interaction is no longer a prediction.
                for scores in self.mined.values_mut() {
                    scores.remove(&pair);
                }
                trace!(%pair, weight, count, "real link stored");
            }
            LinkKind::Mined(metric) => {
                self.mined.entry(metric).or_default().insert(pair, weight);
                trace!(%pair, %metric, weight, "score stored");
            }
        }
        Ok(())
    }

    fn remove(&mut self, u: u64, v: u64, kind: LinkKind) -> Result<bool> {
        let Some(pair) = Pair::canonical(u, v) else {
            return Ok(false);
        };
        Ok(match kind {
            LinkKind::Real => self.real.remove(&pair).is_some(),
            LinkKind::Mined(metric) => self
                .mined
                .get_mut(&metric)
                .is_some_and(|scores| scores.remove(&pair).is_some()),
        })
    }

    fn clear_all(&mut self) -> Result<()> {
        self.real.clear();
        self.mined.clear();
        Ok(())
    }
}
