// src/cli/handlers/mod.rs
//! Dataset and evaluation command handlers.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::eval::{self, EvaluationKind, EvaluationPlan};
use crate::exit::LinkevalExit;
use crate::graph::{self, Graph};
use crate::link::{read_links, write_links, MetricKind};
use crate::reporting;
use crate::split;

pub mod relay;
pub mod store;

/// Settings shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub config: Config,
    pub json: bool,
}

fn load_graph(dataset: &Path) -> Result<Graph> {
    let batch = read_links(dataset)
        .with_context(|| format!("Failed to read dataset {}", dataset.display()))?;
    Ok(Graph::build(&batch.records))
}

/// Handles `analyze_dataset`.
pub fn handle_analyze(ctx: &RunContext, dataset: &Path) -> Result<LinkevalExit> {
    let analysis = graph::analyze(&load_graph(dataset)?);
    if ctx.json {
        reporting::print_json(&analysis)?;
    } else {
        reporting::print_analysis(dataset, &analysis);
    }
    Ok(LinkevalExit::Success)
}

/// Handles `datagen_lcc`.
pub fn handle_datagen_lcc(ctx: &RunContext, dataset: &Path, output: &Path) -> Result<LinkevalExit> {
    let records = graph::lcc_records(&load_graph(dataset)?);
    write_links(output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    tracing::info!(records = records.len(), output = %output.display(), "LCC dataset written");

    if ctx.json {
        reporting::print_json(&serde_json::json!({
            "output": output,
            "edges": records.len(),
        }))?;
    } else {
        let analysis = graph::analyze(&Graph::build(&records));
        reporting::print_analysis(output, &analysis);
    }
    Ok(LinkevalExit::Success)
}

pub struct TraintestArgs<'a> {
    pub dataset: &'a Path,
    pub trainset: &'a Path,
    pub testset: &'a Path,
    pub ratio: f64,
    pub mining: split::MiningKind,
}

/// Handles `traintest`.
pub fn handle_traintest(ctx: &RunContext, args: &TraintestArgs<'_>) -> Result<LinkevalExit> {
    let policy = args.mining.policy()?;
    let records = read_links(args.dataset)
        .with_context(|| format!("Failed to read dataset {}", args.dataset.display()))?
        .records;
    let split = split::split_with(policy.as_ref(), &records, args.ratio)
        .with_context(|| format!("Failed to split {}", args.dataset.display()))?;

    write_links(args.trainset, &split.train)
        .with_context(|| format!("Failed to write {}", args.trainset.display()))?;
    write_links(args.testset, &split.test)
        .with_context(|| format!("Failed to write {}", args.testset.display()))?;

    if ctx.json {
        reporting::print_json(&serde_json::json!({
            "mining": args.mining,
            "train": split.train.len(),
            "test": split.test.len(),
            "target": split.target,
        }))?;
    } else {
        reporting::print_split(&split, args.trainset, args.testset);
    }
    Ok(LinkevalExit::Success)
}

pub struct EvaluateArgs<'a> {
    pub evaluation: &'a str,
    pub metric: &'a str,
    pub dataset: &'a Path,
    pub trainset: &'a Path,
    pub testset: &'a Path,
    pub rank: Option<usize>,
    pub output: Option<&'a Path>,
    pub workers: Option<usize>,
}

/// Handles `evaluate`.
///
/// Undefined ratios are reported, not treated as failures.
pub fn handle_evaluate(ctx: &RunContext, args: &EvaluateArgs<'_>) -> Result<LinkevalExit> {
    let plan = EvaluationPlan {
        evaluations: EvaluationKind::parse_list(args.evaluation)?,
        metrics: MetricKind::parse_list(args.metric)?,
        dataset: args.dataset.to_path_buf(),
        trainset: args.trainset.to_path_buf(),
        testset: args.testset.to_path_buf(),
        rank: args.rank.unwrap_or(ctx.config.evaluation.precision_rank),
        workers: args.workers.unwrap_or_else(|| ctx.config.effective_workers()),
        pace: ctx.config.progress.pace,
        output: args.output.map(PathBuf::from),
    };

    let results = eval::run(&plan, &ctx.config.store.path).context("Evaluation failed")?;
    for result in &results {
        if let Err(e) = result.defined() {
            tracing::warn!(error = %e, "metric undefined");
        }
    }

    if ctx.json {
        reporting::print_json(&results)?;
    } else {
        reporting::print_evaluations(&results);
    }
    Ok(LinkevalExit::Success)
}
