// src/cli/handlers/store.rs
//! Score-store maintenance handlers.

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use super::RunContext;
use crate::exit::LinkevalExit;
use crate::reporting;
use crate::store::{self, AggregationMode};

/// Handles `save`.
pub fn handle_save(
    ctx: &RunContext,
    dataset: &Path,
    aggregation: Option<AggregationMode>,
    ewma_factor: Option<f64>,
) -> Result<LinkevalExit> {
    let mode = aggregation.unwrap_or(ctx.config.store.aggregation);
    let policy = mode.resolve(ewma_factor.unwrap_or(ctx.config.store.ewma_factor))?;
    let outcome = store::save_dataset(
        &ctx.config.store.path,
        dataset,
        policy,
        ctx.config.progress.pace,
    )
    .with_context(|| format!("Failed to save {}", dataset.display()))?;

    if ctx.json {
        reporting::print_json(&outcome)?;
    } else {
        reporting::print_save(dataset, &outcome);
    }
    Ok(LinkevalExit::Success)
}

/// Handles `check_dataset_db`.
pub fn handle_check_dataset(
    ctx: &RunContext,
    dataset: &Path,
    wait: bool,
    period: Option<u64>,
    max_polls: Option<usize>,
) -> Result<LinkevalExit> {
    let period = match period {
        Some(secs) => Some(Duration::from_secs(secs)),
        None if wait => Some(ctx.config.poll_period()),
        None => None,
    };
    let outcome = store::check_dataset(
        &ctx.config.store.path,
        dataset,
        period,
        max_polls.unwrap_or(ctx.config.polling.max_polls),
    )
    .with_context(|| format!("Failed to check {}", dataset.display()))?;

    if ctx.json {
        reporting::print_json(&outcome)?;
    } else {
        reporting::print_dataset_check(&outcome);
    }
    Ok(if outcome.is_complete() {
        LinkevalExit::Success
    } else {
        LinkevalExit::CheckFailed
    })
}

/// Handles `wait_stability_db`.
pub fn handle_wait_stability(
    ctx: &RunContext,
    period: Option<u64>,
    stability_polls: Option<usize>,
    max_polls: Option<usize>,
) -> Result<LinkevalExit> {
    let period = period.map_or_else(|| ctx.config.poll_period(), Duration::from_secs);
    let outcome = store::wait_stability(
        &ctx.config.store.path,
        period,
        stability_polls.unwrap_or(ctx.config.polling.stability_polls),
        max_polls.unwrap_or(ctx.config.polling.max_polls),
    )
    .context("Failed to poll store")?;

    if ctx.json {
        reporting::print_json(&outcome)?;
    } else {
        reporting::print_stability(&outcome);
    }
    Ok(if outcome.stable {
        LinkevalExit::Success
    } else {
        LinkevalExit::CheckFailed
    })
}

/// Handles `clear_db`.
pub fn handle_clear(ctx: &RunContext) -> Result<LinkevalExit> {
    let removed = store::clear_store(&ctx.config.store.path).context("Failed to clear store")?;
    if ctx.json {
        reporting::print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("Removed {removed} entries from {}", ctx.config.store.path.display());
    }
    Ok(LinkevalExit::Success)
}
