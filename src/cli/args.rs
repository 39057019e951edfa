use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::split::MiningKind;
use crate::store::AggregationMode;

#[derive(Parser)]
#[command(
    name = "linkeval",
    version,
    about = "Link-prediction datasets, train/test splits and evaluation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Config file (defaults to ./linkeval.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Print reports as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Node, edge and component counts of a dataset
    #[command(name = "analyze_dataset")]
    AnalyzeDataset {
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
    },
    /// Write the largest connected component of a dataset
    #[command(name = "datagen_lcc")]
    DatagenLcc {
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Split a dataset into connected train and held-out test sets
    #[command(name = "traintest")]
    Traintest {
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        #[arg(long, value_name = "FILE")]
        trainset: PathBuf,
        #[arg(long, value_name = "FILE")]
        testset: PathBuf,
        /// Fraction of edges to hold out, in (0, 1)
        #[arg(long)]
        test_ratio: f64,
        #[arg(long, value_enum, default_value_t = MiningKind::Prediction)]
        mining: MiningKind,
    },
    /// Publish a probe record and read it back
    Check {
        #[arg(long)]
        topic: Option<String>,
    },
    /// Relay every record of a dataset to a topic
    Publish {
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        #[arg(long)]
        topic: Option<String>,
    },
    /// Store every record of a dataset in the score store
    Save {
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        #[arg(long, value_enum)]
        aggregation: Option<AggregationMode>,
        #[arg(long)]
        ewma_factor: Option<f64>,
    },
    /// Count dataset records present in the score store
    #[command(name = "check_dataset_db")]
    CheckDatasetDb {
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        /// Keep polling until every record is present
        #[arg(long)]
        wait: bool,
        /// Poll period in seconds (implies --wait)
        #[arg(long, value_name = "SECS")]
        period: Option<u64>,
        #[arg(long)]
        max_polls: Option<usize>,
    },
    /// Poll the score store until its size stops changing
    #[command(name = "wait_stability_db")]
    WaitStabilityDb {
        #[arg(long, value_name = "SECS")]
        period: Option<u64>,
        #[arg(long)]
        stability_polls: Option<usize>,
        #[arg(long)]
        max_polls: Option<usize>,
    },
    /// Compute AUC and/or Precision@k for the given metrics
    Evaluate {
        /// AUC, PRECISION, a comma list, or ALL
        #[arg(long, default_value = "ALL")]
        evaluation: String,
        /// Metric names as a comma list, or ALL
        #[arg(long, default_value = "ALL")]
        metric: String,
        #[arg(long, value_name = "FILE")]
        dataset: PathBuf,
        #[arg(long, value_name = "FILE")]
        trainset: PathBuf,
        #[arg(long, value_name = "FILE")]
        testset: PathBuf,
        #[arg(long)]
        rank: Option<usize>,
        /// Directory receiving one .out file per result
        #[arg(long, value_name = "DIR")]
        output: Option<PathBuf>,
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Remove every entry from the score store
    #[command(name = "clear_db")]
    ClearDb,
}
