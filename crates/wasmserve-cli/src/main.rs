//! wasmserve entry point: argument parsing, logging setup, and command
//! dispatch.

use clap::Parser;
use miette::Result;
use wasmserve_cli::{cli, commands, error, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);

    let result = match args.command {
        cli::Command::Init(init_args) => commands::init_execute(init_args).await,
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Run(run_args) => commands::run_execute(run_args).await,
        cli::Command::Watch(watch_args) => commands::watch_execute(watch_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
