// src/eval/mod.rs
//! Evaluation engine: AUC and Precision@k against a score store.

pub mod auc;
pub mod precision;
pub mod report;
pub mod sets;

pub use auc::{auc, AucCounts, AucResult};
pub use precision::{precision, PrecisionResult};
pub use report::{output_path, write_result, EvaluationResult};
pub use sets::{detectable_links, EvaluationSets};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LinkError, Result};
use crate::link::{kind::parse_identifier_list, read_links, MetricKind};
use crate::store::with_store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvaluationKind {
    Auc,
    Precision,
}

impl EvaluationKind {
    pub const ALL: [EvaluationKind; 2] = [EvaluationKind::Auc, EvaluationKind::Precision];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EvaluationKind::Auc => "AUC",
            EvaluationKind::Precision => "PRECISION",
        }
    }

    /// Parses `ALL` or a comma-separated list of evaluation names.
    ///
    /// # Errors
    /// Returns `UnknownIdentifier` for an unknown entry and `InvalidParameter`
    /// for an empty list.
    pub fn parse_list(input: &str) -> Result<Vec<Self>> {
        parse_identifier_list(input, &Self::ALL)
    }
}

impl fmt::Display for EvaluationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationKind {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| LinkError::UnknownIdentifier {
                kind: "evaluation",
                value: trimmed.to_string(),
            })
    }
}

/// Everything one `evaluate` run needs.
#[derive(Debug, Clone)]
pub struct EvaluationPlan {
    pub evaluations: Vec<EvaluationKind>,
    pub metrics: Vec<MetricKind>,
    pub dataset: PathBuf,
    pub trainset: PathBuf,
    pub testset: PathBuf,
    pub rank: usize,
    pub workers: usize,
    /// Percent of comparisons between progress lines.
    pub pace: f64,
    pub output: Option<PathBuf>,
}

/// Bounded worker pool for AUC comparisons.
///
/// # Errors
/// Returns `InvalidParameter` for zero workers or if the pool cannot start.
pub fn build_pool(workers: usize) -> Result<ThreadPool> {
    if workers == 0 {
        return Err(LinkError::InvalidParameter(
            "evaluation needs at least one worker".to_string(),
        ));
    }
    ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("linkeval-auc-{i}"))
        .build()
        .map_err(|e| LinkError::InvalidParameter(format!("cannot start worker pool: {e}")))
}

/// Runs every `(evaluation, metric)` pair of `plan` against the store at
/// `store_path`, one store session per pair, and writes output files when
/// `plan.output` is set.
///
/// # Errors
/// Returns `Io` for unreadable inputs or outputs and any store error.
pub fn run(plan: &EvaluationPlan, store_path: &Path) -> Result<Vec<EvaluationResult>> {
    let dataset = read_links(&plan.dataset)?.records;
    let train = read_links(&plan.trainset)?.records;
    let test = read_links(&plan.testset)?.records;

    let sets = plan
        .evaluations
        .contains(&EvaluationKind::Auc)
        .then(|| EvaluationSets::build(&dataset, &train, &test));
    let detectable = plan
        .evaluations
        .contains(&EvaluationKind::Precision)
        .then(|| detectable_links(&train, &test));
    let pool = match sets {
        Some(_) => Some(build_pool(plan.workers)?),
        None => None,
    };

    let mut results = Vec::with_capacity(plan.evaluations.len() * plan.metrics.len());
    for &evaluation in &plan.evaluations {
        for &metric in &plan.metrics {
            let result = with_store(store_path, |store| {
                let store = &*store;
                match (evaluation, &sets, &pool, &detectable) {
                    (EvaluationKind::Auc, Some(sets), Some(pool), _) => {
                        auc(store, metric, sets, pool, plan.pace).map(EvaluationResult::Auc)
                    }
                    (EvaluationKind::Precision, _, _, Some(detectable)) => {
                        precision(store, metric, detectable, plan.rank)
                            .map(EvaluationResult::Precision)
                    }
                    _ => Err(LinkError::InvalidParameter(format!(
                        "{evaluation} inputs were not prepared"
                    ))),
                }
            })?;
            info!(%evaluation, %metric, value = result.value(), "evaluation result");

            if let Some(dir) = &plan.output {
                let path = write_result(dir, &plan.trainset, &result)?;
                info!(path = %path.display(), "evaluation written");
            }
            results.push(result);
        }
    }
    Ok(results)
}
