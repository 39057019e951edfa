//! Console output for command results.
//!
//! Every report has a JSON twin through [`print_json`]; the colored form is
//! for people, the JSON form for scripts.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::eval::EvaluationResult;
use crate::graph::GraphAnalysis;
use crate::relay::PublishOutcome;
use crate::split::Split;
use crate::store::{CheckOutcome, SaveOutcome, StabilityOutcome};

const RULE_WIDTH: usize = 60;

fn header(title: &str) {
    println!();
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
    println!(" {}", title.bold());
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

fn footer() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}

fn row(label: &str, value: impl std::fmt::Display) {
    println!("  {:<22} {}", label.white(), value);
}

pub fn print_analysis(dataset: &Path, analysis: &GraphAnalysis) {
    header("DATASET ANALYSIS");
    row("Dataset:", dataset.display());
    row("Nodes:", analysis.num_nodes);
    row("Edges:", analysis.num_edges);
    row("Components:", analysis.component_count);
    row("LCC nodes:", analysis.lcc_node_count);
    row("LCC edges:", analysis.lcc_edge_count);
    footer();
}

pub fn print_split(split: &Split, trainset: &Path, testset: &Path) {
    header("TRAIN / TEST SPLIT");
    row("Train edges:", format!("{} -> {}", split.train.len(), trainset.display()));
    row("Test edges:", format!("{} -> {}", split.test.len(), testset.display()));
    if split.is_short() {
        row(
            "Target:",
            format!("{} {}", split.target, "(not reachable without disconnecting)".yellow()),
        );
    } else {
        row("Target:", split.target);
    }
    footer();
}

pub fn print_evaluations(results: &[EvaluationResult]) {
    header("EVALUATION");
    for result in results {
        let value = result.value();
        let shown = if value.is_nan() {
            "undefined".yellow().to_string()
        } else {
            format!("{value:.4}").green().bold().to_string()
        };
        println!("  {:<18} {}", format!("{}({})", result.kind(), result.metric()).white(), shown);
        let details = result
            .details()
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {:<18} {}", "", details.dimmed());
    }
    footer();
}

pub fn print_save(dataset: &Path, outcome: &SaveOutcome) {
    println!(
        "{} saved {} links from {} ({} skipped)",
        "✓".green(),
        outcome.saved,
        dataset.display(),
        outcome.skipped
    );
}

pub fn print_publish(topic: &str, outcome: &PublishOutcome) {
    println!(
        "{} published {} links to {} ({} skipped)",
        "✓".green(),
        outcome.published,
        topic.bold(),
        outcome.skipped
    );
}

pub fn print_dataset_check(outcome: &CheckOutcome) {
    if outcome.is_complete() {
        println!("{} all {} links present in store", "✓".green(), outcome.total);
    } else {
        println!(
            "{} {} of {} links missing from store ({} saved)",
            "✗".red(),
            outcome.missing,
            outcome.total,
            outcome.saved
        );
    }
}

pub fn print_stability(outcome: &StabilityOutcome) {
    let count = outcome
        .count
        .map_or_else(|| "unknown".to_string(), |c| c.to_string());
    if outcome.stable {
        println!("{} store stable at {} entries after {} polls", "✓".green(), count, outcome.polls);
    } else {
        println!("{} store not stable after {} polls (last count {})", "✗".red(), outcome.polls, count);
    }
}

pub fn print_relay_check(topic: &str, ok: bool) {
    if ok {
        println!("{} relay round-trip on {} succeeded", "✓".green(), topic.bold());
    } else {
        println!("{} relay round-trip on {} failed", "✗".red(), topic.bold());
    }
}

/// Prints any serializable report as pretty JSON on stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json<T: serde::Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}
