use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::store::AggregationMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub aggregation: AggregationMode,
    #[serde(default = "default_ewma_factor")]
    pub ewma_factor: f64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            aggregation: AggregationMode::default(),
            ewma_factor: default_ewma_factor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// 0 picks the available parallelism, capped at 8.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_precision_rank")]
    pub precision_rank: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            precision_rank: default_precision_rank(),
        }
    }
}

/// Progress reporting for long loops (`save`, `publish`, AUC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Percent of work between two progress lines.
    #[serde(default = "default_pace")]
    pub pace: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            pace: default_pace(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_topic")]
    pub topic: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            dir: default_relay_dir(),
            topic: default_topic(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_period_secs")]
    pub period_secs: u64,
    #[serde(default = "default_stability_polls")]
    pub stability_polls: usize,
    /// 0 polls until the condition holds.
    #[serde(default)]
    pub max_polls: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            period_secs: default_period_secs(),
            stability_polls: default_stability_polls(),
            max_polls: 0,
        }
    }
}

fn default_store_path() -> PathBuf { PathBuf::from("linkeval-store.json") }
const fn default_ewma_factor() -> f64 { 0.5 }
const fn default_precision_rank() -> usize { 3 }
const fn default_pace() -> f64 { 5.0 }
fn default_relay_dir() -> PathBuf { PathBuf::from("linkeval-relay") }
fn default_topic() -> String { "links".to_string() }
const fn default_period_secs() -> u64 { 5 }
const fn default_stability_polls() -> usize { 10 }

/// Contents of `linkeval.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}
