use clap::Parser;
use colored::Colorize;
use linkeval_core::cli::{self, Cli, RunContext};
use linkeval_core::config::Config;
use linkeval_core::exit::LinkevalExit;
use linkeval_core::logging;

fn main() -> LinkevalExit {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        let _ = Cli::command().print_help();
        return LinkevalExit::Success;
    };

    let result = Config::load(cli.config.as_deref()).and_then(|config| {
        let ctx = RunContext {
            config,
            json: cli.json,
        };
        cli::dispatch::execute(command, &ctx)
    });

    match result {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red(), e);
            LinkevalExit::from_error(&e)
        }
    }
}
