// src/eval/auc.rs
//! AUC over `(missing, nonexistent)` score comparisons.

use rayon::prelude::*;
use rayon::ThreadPool;
use serde::Serialize;
use tracing::{debug, info};

use super::sets::EvaluationSets;
use crate::error::Result;
use crate::link::MetricKind;
use crate::progress::Progress;
use crate::store::ScoreStore;

/// Comparison tallies. Only comparisons with both scores present count
/// toward `n`; the rest are tallied in `skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AucCounts {
    pub n: u64,
    pub n1: u64,
    pub n2: u64,
    pub skipped: u64,
}

impl AucCounts {
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            n: self.n + other.n,
            n1: self.n1 + other.n1,
            n2: self.n2 + other.n2,
            skipped: self.skipped + other.skipped,
        }
    }

    /// Tallies one comparison.
    #[allow(clippy::float_cmp)]
    pub fn record(&mut self, missing: Option<f64>, nonexistent: Option<f64>) {
        let (Some(w1), Some(w2)) = (missing, nonexistent) else {
            self.skipped += 1;
            return;
        };
        self.n += 1;
        if w1 > w2 {
            self.n1 += 1;
        } else if w1 == w2 {
            self.n2 += 1;
        }
    }

    /// `(n1 + 0.5·n2) / n`, NaN when nothing was compared.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        if self.n == 0 {
            return f64::NAN;
        }
        (self.n1 as f64 + 0.5 * self.n2 as f64) / self.n as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AucResult {
    pub metric: MetricKind,
    pub missing_links: usize,
    pub nonexistent_links: usize,
    pub n: u64,
    pub n1: u64,
    pub n2: u64,
    pub skipped: u64,
    pub value: f64,
}

/// Computes AUC for `metric` on `pool`.
///
/// Nonexistent-link scores are fetched once up front; each missing link is
/// then compared against all of them by one worker, which folds into its own
/// [`AucCounts`]. Partial counts are merged at the end.
///
/// # Errors
/// Returns the first store error any worker hits.
pub fn auc<S>(
    store: &S,
    metric: MetricKind,
    sets: &EvaluationSets,
    pool: &ThreadPool,
    pace: f64,
) -> Result<AucResult>
where
    S: ScoreStore + Sync + ?Sized,
{
    info!(
        %metric,
        missing = sets.missing.len(),
        nonexistent = sets.nonexistent.len(),
        workers = pool.current_num_threads(),
        "evaluating AUC"
    );
    let progress = Progress::new("auc", sets.comparisons(), pace);

    let counts = pool.install(|| -> Result<AucCounts> {
        let nonexistent: Vec<Option<f64>> = sets
            .nonexistent
            .par_iter()
            .map(|pair| store.score(metric, pair.lo, pair.hi))
            .collect::<Result<_>>()?;

        sets.missing
            .par_iter()
            .map(|pair| -> Result<AucCounts> {
                let w1 = store.score(metric, pair.lo, pair.hi)?;
                let mut local = AucCounts::default();
                for &w2 in &nonexistent {
                    local.record(w1, w2);
                }
                progress.advance(nonexistent.len());
                Ok(local)
            })
            .try_reduce(AucCounts::default, |a, b| Ok(a.merge(b)))
    })?;
    progress.finish();

    let result = AucResult {
        metric,
        missing_links: sets.missing.len(),
        nonexistent_links: sets.nonexistent.len(),
        n: counts.n,
        n1: counts.n1,
        n2: counts.n2,
        skipped: counts.skipped,
        value: counts.value(),
    };
    debug!(?result, "AUC done");
    Ok(result)
}
