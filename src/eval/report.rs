// src/eval/report.rs
//! Evaluation results: line form and output files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::auc::AucResult;
use super::precision::PrecisionResult;
use super::EvaluationKind;
use crate::error::{LinkError, Result};
use crate::link::MetricKind;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "evaluation", rename_all = "UPPERCASE")]
pub enum EvaluationResult {
    Auc(AucResult),
    Precision(PrecisionResult),
}

impl EvaluationResult {
    #[must_use]
    pub fn kind(&self) -> EvaluationKind {
        match self {
            EvaluationResult::Auc(_) => EvaluationKind::Auc,
            EvaluationResult::Precision(_) => EvaluationKind::Precision,
        }
    }

    #[must_use]
    pub fn metric(&self) -> MetricKind {
        match self {
            EvaluationResult::Auc(r) => r.metric,
            EvaluationResult::Precision(r) => r.metric,
        }
    }

    /// The ratio, NaN when undefined.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            EvaluationResult::Auc(r) => r.value,
            EvaluationResult::Precision(r) => r.value,
        }
    }

    /// The ratio, or `UndefinedMetric` if its denominator was zero.
    ///
    /// # Errors
    /// Returns `UndefinedMetric` when the value is NaN.
    pub fn defined(&self) -> Result<f64> {
        let value = self.value();
        if !value.is_nan() {
            return Ok(value);
        }
        let reason = match self {
            EvaluationResult::Auc(r) => format!(
                "no comparison had both scores ({} missing x {} nonexistent, {} skipped)",
                r.missing_links, r.nonexistent_links, r.skipped
            ),
            EvaluationResult::Precision(_) => "no detectable test links".to_string(),
        };
        Err(LinkError::UndefinedMetric {
            evaluation: self.kind().as_str(),
            reason,
        })
    }

    /// Supporting counts, sorted by key.
    #[must_use]
    pub fn details(&self) -> Vec<(&'static str, String)> {
        let mut details = match self {
            EvaluationResult::Auc(r) => vec![
                ("missing_links", r.missing_links.to_string()),
                ("nonexistent_links", r.nonexistent_links.to_string()),
                ("n", r.n.to_string()),
                ("n1", r.n1.to_string()),
                ("n2", r.n2.to_string()),
                ("skipped", r.skipped.to_string()),
            ],
            EvaluationResult::Precision(r) => vec![
                ("rank", r.rank.to_string()),
                ("hits", r.hits.to_string()),
                ("detectable", r.detectable.to_string()),
            ],
        };
        details.sort_by_key(|(key, _)| *key);
        details
    }

    /// `EVAL(METRIC) (key:value | ...) : value`
    #[must_use]
    pub fn line(&self) -> String {
        let details = self
            .details()
            .iter()
            .map(|(key, value)| format!("{key}:{value}"))
            .collect::<Vec<_>>()
            .join(" | ");
        format!(
            "{}({}) ({details}) : {}",
            self.kind(),
            self.metric(),
            self.value()
        )
    }
}

/// `<dir>/<trainset-stem>_<EVAL>_<METRIC>.out`
#[must_use]
pub fn output_path(dir: &Path, trainset: &Path, result: &EvaluationResult) -> PathBuf {
    let stem = trainset
        .file_stem()
        .map_or_else(|| "trainset".into(), |s| s.to_string_lossy());
    dir.join(format!("{stem}_{}_{}.out", result.kind(), result.metric()))
}

/// Writes the result line to its output file and returns the path.
///
/// # Errors
/// Returns `Io` if the directory or file cannot be written.
pub fn write_result(dir: &Path, trainset: &Path, result: &EvaluationResult) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| LinkError::io(e, dir))?;
    let path = output_path(dir, trainset, result);
    fs::write(&path, format!("{}\n", result.line())).map_err(|e| LinkError::io(e, &path))?;
    Ok(path)
}
