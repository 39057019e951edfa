// src/eval/precision.rs
//! Precision@k against the store's top-ranked predictions.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::link::{MetricKind, Pair};
use crate::store::ScoreStore;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecisionResult {
    pub metric: MetricKind,
    pub rank: usize,
    pub hits: usize,
    pub detectable: usize,
    pub value: f64,
}

/// `hits / |detectable|` where `hits` counts detectable pairs among the top
/// `rank` predictions. NaN when nothing is detectable.
///
/// # Errors
/// Returns `InvalidParameter` for `rank == 0`, or a store error.
#[allow(clippy::cast_precision_loss)]
pub fn precision<S>(
    store: &S,
    metric: MetricKind,
    detectable: &BTreeSet<Pair>,
    rank: usize,
) -> Result<PrecisionResult>
where
    S: ScoreStore + ?Sized,
{
    if rank == 0 {
        return Err(LinkError::InvalidParameter(
            "precision rank must be at least 1".to_string(),
        ));
    }
    info!(%metric, rank, detectable = detectable.len(), "evaluating precision");

    let top = store.top_k(metric, rank)?;
    let hits = top.iter().filter(|s| detectable.contains(&s.pair)).count();
    let value = if detectable.is_empty() {
        f64::NAN
    } else {
        hits as f64 / detectable.len() as f64
    };

    let result = PrecisionResult {
        metric,
        rank,
        hits,
        detectable: detectable.len(),
        value,
    };
    debug!(?result, top = top.len(), "precision done");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::LinkKind;
    use crate::store::{Aggregation, MemoryStore};

    fn store_with(scores: &[(u64, u64, f64)]) -> MemoryStore {
        let mut store = MemoryStore::new();
        for &(u, v, w) in scores {
            let _ = store.put(LinkKind::Mined(MetricKind::Ra), u, v, w, Aggregation::Overwrite);
        }
        store
    }

    fn set(items: &[(u64, u64)]) -> BTreeSet<Pair> {
        items.iter().filter_map(|&(u, v)| Pair::canonical(u, v)).collect()
    }

    #[test]
    fn counts_hits_within_rank() {
        let store = store_with(&[(1, 2, 0.9), (3, 4, 0.8), (5, 6, 0.7)]);
        let detectable = set(&[(1, 2), (5, 6)]);
        let result = precision(&store, MetricKind::Ra, &detectable, 2);
        let result = result.ok();
        assert_eq!(result.map(|r| r.hits), Some(1));
        assert_eq!(result.map(|r| r.value), Some(0.5));
    }

    #[test]
    fn nothing_detectable_is_nan() {
        let store = store_with(&[(1, 2, 0.9)]);
        let result = precision(&store, MetricKind::Ra, &BTreeSet::new(), 3).ok();
        assert!(result.is_some_and(|r| r.value.is_nan() && r.detectable == 0));
    }

    #[test]
    fn zero_rank_is_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            precision(&store, MetricKind::Ra, &set(&[(1, 2)]), 0),
            Err(LinkError::InvalidParameter(_))
        ));
    }
}
