// src/cli/handlers/relay.rs
//! Relay handlers.

use anyhow::{Context, Result};
use std::path::Path;

use super::RunContext;
use crate::exit::LinkevalExit;
use crate::relay::{self, FileRelay};
use crate::reporting;

fn relay_and_topic<'a>(ctx: &'a RunContext, topic: Option<&'a str>) -> (FileRelay, &'a str) {
    (
        FileRelay::new(&ctx.config.relay.dir),
        topic.unwrap_or(&ctx.config.relay.topic),
    )
}

/// Handles `check`.
pub fn handle_check(ctx: &RunContext, topic: Option<&str>) -> Result<LinkevalExit> {
    let (relay, topic) = relay_and_topic(ctx, topic);
    let ok = relay::check_relay(&relay, topic)
        .with_context(|| format!("Relay probe on {topic} failed"))?;

    if ctx.json {
        reporting::print_json(&serde_json::json!({ "topic": topic, "ok": ok }))?;
    } else {
        reporting::print_relay_check(topic, ok);
    }
    Ok(if ok {
        LinkevalExit::Success
    } else {
        LinkevalExit::CheckFailed
    })
}

/// Handles `publish`.
pub fn handle_publish(ctx: &RunContext, dataset: &Path, topic: Option<&str>) -> Result<LinkevalExit> {
    let (relay, topic) = relay_and_topic(ctx, topic);
    let outcome = relay::publish_dataset(&relay, topic, dataset, ctx.config.progress.pace)
        .with_context(|| format!("Failed to publish {}", dataset.display()))?;

    if ctx.json {
        reporting::print_json(&outcome)?;
    } else {
        reporting::print_publish(topic, &outcome);
    }
    Ok(LinkevalExit::Success)
}
