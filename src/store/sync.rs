// src/store/sync.rs
//! Dataset-level store maintenance: populate, verify, wait, clear.
//!
//! Every operation opens its own session per logical step, so a polling
//! loop never holds the store between polls.

use std::collections::HashMap;
use std::path::Path;
use std::thread;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{with_store, Aggregation, ScoreStore};
use crate::error::{LinkError, Result};
use crate::link::{self, LinkRecord, Pair};
use crate::progress::Progress;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub saved: usize,
    pub skipped: usize,
}

/// Streams every record of `dataset` into the store.
///
/// Malformed lines and self-loops are skipped with a warning.
///
/// # Errors
/// Returns `Io` if the dataset cannot be read, or a store error.
pub fn save_dataset(
    store_path: &Path,
    dataset: &Path,
    policy: Aggregation,
    pace: f64,
) -> Result<SaveOutcome> {
    let total = link::count_lines(dataset)?;
    let progress = Progress::new("save", total, pace);
    let mut self_loops = 0;

    let (accepted, malformed) = with_store(store_path, |store| {
        link::for_each_link(dataset, |record| {
            progress.step();
            if record.src == record.dst {
                warn!(%record, "self-loop cannot be stored, skipping");
                self_loops += 1;
                return Ok(());
            }
            store.put(record.kind, record.src, record.dst, record.weight, policy)
        })
    })?;
    progress.finish();

    let outcome = SaveOutcome {
        saved: accepted - self_loops,
        skipped: malformed + self_loops,
    };
    info!(saved = outcome.saved, skipped = outcome.skipped, %policy, "dataset saved");
    Ok(outcome)
}

/// Result of a dataset presence check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    pub total: usize,
    pub saved: usize,
    pub missing: usize,
}

impl CheckOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing == 0
    }
}

/// Counts how many dataset records are stored with their exact weight.
///
/// Without a `period` this is a single check. With one, only the missing
/// records are re-checked every `period` until none remain or `max_polls`
/// polls have run (`0` polls until complete). `StoreUnavailable` is fatal
/// for a single check and retried while polling.
///
/// Records match on their exact weight. A `REAL` pair listed more than once
/// with different weights is stored as a single weight (the aggregate, or
/// the last one under `Aggregation::Overwrite`), so some of its records stay
/// missing and an unbounded poll never completes. Such pairs are reported
/// with a warning.
///
/// # Errors
/// Returns `Io` if the dataset cannot be read, or a store error.
pub fn check_dataset(
    store_path: &Path,
    dataset: &Path,
    period: Option<Duration>,
    max_polls: usize,
) -> Result<CheckOutcome> {
    let batch = link::read_links(dataset)?;
    let total = batch.records.len();
    let conflicting = conflicting_real_pairs(&batch.records);
    if conflicting > 0 {
        warn!(
            conflicting,
            "dataset repeats REAL pairs with different weights; aggregated weights will not match"
        );
    }
    let mut pending = batch.records;
    let mut polls = 0;

    loop {
        polls += 1;
        match with_store(store_path, |store| missing_records(store, &pending)) {
            Ok(still_missing) => pending = still_missing,
            Err(LinkError::StoreUnavailable(reason)) if period.is_some() => {
                warn!(%reason, poll = polls, "store unavailable, retrying");
            }
            Err(e) => return Err(e),
        }
        info!(total, missing = pending.len(), poll = polls, "dataset check");

        let Some(period) = period else { break };
        if pending.is_empty() || (max_polls > 0 && polls >= max_polls) {
            break;
        }
        thread::sleep(period);
    }

    for record in pending.iter().take(10) {
        debug!(%record, "missing from store");
    }
    Ok(CheckOutcome {
        total,
        saved: total - pending.len(),
        missing: pending.len(),
    })
}

fn missing_records<S: ScoreStore + ?Sized>(
    store: &S,
    records: &[LinkRecord],
) -> Result<Vec<LinkRecord>> {
    let mut missing = Vec::new();
    for record in records {
        if !store.exists(record.kind, record.src, record.dst, record.weight)? {
            missing.push(*record);
        }
    }
    Ok(missing)
}

/// Number of `REAL` pairs that appear with more than one weight.
fn conflicting_real_pairs(records: &[LinkRecord]) -> usize {
    let mut first_weight: HashMap<Pair, (f64, bool)> = HashMap::new();
    for record in records.iter().filter(|r| r.kind.is_real()) {
        let Some(pair) = Pair::of(record) else {
            continue;
        };
        first_weight
            .entry(pair)
            .and_modify(|(weight, conflict)| *conflict |= *weight != record.weight)
            .or_insert((record.weight, false));
    }
    first_weight.values().filter(|(_, conflict)| *conflict).count()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StabilityOutcome {
    /// Last observed edge count, if any poll succeeded.
    pub count: Option<usize>,
    pub polls: usize,
    pub stable: bool,
}

/// Polls `count_edges` every `period` until the count has stayed the same
/// for `stability_polls` consecutive polls.
///
/// An unavailable store is logged, retried, and counts as a change.
/// `max_polls == 0` polls until stable.
///
/// # Errors
/// Returns any store error other than `StoreUnavailable`.
pub fn wait_stability(
    store_path: &Path,
    period: Duration,
    stability_polls: usize,
    max_polls: usize,
) -> Result<StabilityOutcome> {
    let mut outcome = StabilityOutcome::default();
    let mut unchanged = 0;

    loop {
        outcome.polls += 1;
        match with_store(store_path, |store| store.count_edges()) {
            Ok(count) if outcome.count == Some(count) => unchanged += 1,
            Ok(count) => {
                outcome.count = Some(count);
                unchanged = 0;
            }
            Err(LinkError::StoreUnavailable(reason)) => {
                warn!(%reason, poll = outcome.polls, "store unavailable, retrying");
                outcome.count = None;
                unchanged = 0;
            }
            Err(e) => return Err(e),
        }
        info!(count = ?outcome.count, unchanged, poll = outcome.polls, "stability poll");

        if outcome.count.is_some() && unchanged >= stability_polls {
            outcome.stable = true;
            return Ok(outcome);
        }
        if max_polls > 0 && outcome.polls >= max_polls {
            return Ok(outcome);
        }
        thread::sleep(period);
    }
}

/// Empties the store and returns how many entries it held.
///
/// # Errors
/// Returns a store error if the snapshot cannot be read or written.
pub fn clear_store(store_path: &Path) -> Result<usize> {
    let removed = with_store(store_path, |store| {
        let count = store.count_edges()?;
        store.clear_all()?;
        Ok(count)
    })?;
    info!(removed, "store cleared");
    Ok(removed)
}
