//! Command dispatch logic extracted from binary to reduce main function size.

use super::{
    args::Commands,
    handlers::{
        handle_analyze, handle_datagen_lcc, handle_evaluate, handle_traintest, relay, store,
        EvaluateArgs, RunContext, TraintestArgs,
    },
};
use crate::exit::LinkevalExit;
use anyhow::Result;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands, ctx: &RunContext) -> Result<LinkevalExit> {
    match command {
        Commands::AnalyzeDataset { .. }
        | Commands::DatagenLcc { .. }
        | Commands::Traintest { .. }
        | Commands::Evaluate { .. } => handle_dataset_ops(command, ctx),

        Commands::Save { .. }
        | Commands::CheckDatasetDb { .. }
        | Commands::WaitStabilityDb { .. }
        | Commands::ClearDb => handle_store_ops(command, ctx),

        Commands::Check { topic } => relay::handle_check(ctx, topic.as_deref()),
        Commands::Publish { dataset, topic } => {
            relay::handle_publish(ctx, &dataset, topic.as_deref())
        }
    }
}

fn handle_dataset_ops(command: Commands, ctx: &RunContext) -> Result<LinkevalExit> {
    match command {
        Commands::AnalyzeDataset { dataset } => handle_analyze(ctx, &dataset),
        Commands::DatagenLcc { dataset, output } => handle_datagen_lcc(ctx, &dataset, &output),
        Commands::Traintest {
            dataset,
            trainset,
            testset,
            test_ratio,
            mining,
        } => handle_traintest(
            ctx,
            &TraintestArgs {
                dataset: &dataset,
                trainset: &trainset,
                testset: &testset,
                ratio: test_ratio,
                mining,
            },
        ),
        Commands::Evaluate {
            evaluation,
            metric,
            dataset,
            trainset,
            testset,
            rank,
            output,
            workers,
        } => handle_evaluate(
            ctx,
            &EvaluateArgs {
                evaluation: &evaluation,
                metric: &metric,
                dataset: &dataset,
                trainset: &trainset,
                testset: &testset,
                rank,
                output: output.as_deref(),
                workers,
            },
        ),
        _ => Err(anyhow::anyhow!("Internal error: Invalid dataset command")),
    }
}

fn handle_store_ops(command: Commands, ctx: &RunContext) -> Result<LinkevalExit> {
    match command {
        Commands::Save {
            dataset,
            aggregation,
            ewma_factor,
        } => store::handle_save(ctx, &dataset, aggregation, ewma_factor),
        Commands::CheckDatasetDb {
            dataset,
            wait,
            period,
            max_polls,
        } => store::handle_check_dataset(ctx, &dataset, wait, period, max_polls),
        Commands::WaitStabilityDb {
            period,
            stability_polls,
            max_polls,
        } => store::handle_wait_stability(ctx, period, stability_polls, max_polls),
        Commands::ClearDb => store::handle_clear(ctx),
        _ => Err(anyhow::anyhow!("Internal error: Invalid store command")),
    }
}
