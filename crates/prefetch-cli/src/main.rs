use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use prefetch_core::errors::EXIT_FAILURE;
use tracing::info;

mod args;
mod cmd;
mod logging;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    // Help short-circuits everything, including invalid arguments before it.
    if args::wants_help(std::env::args_os().skip(1).map(|a| a.to_string_lossy().into_owned())) {
        return match args::Cli::command().print_long_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::from(EXIT_FAILURE as u8),
        };
    }

    let cli = args::Cli::parse();
    logging::init(cli.verbose);

    match cmd::dispatch(cli).await {
        Ok(report) => {
            info!(records = report.records, "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            output::eprintln_error(&err.to_string());
            let code = u8::try_from(err.exit_code()).unwrap_or(EXIT_FAILURE as u8);
            ExitCode::from(code)
        }
    }
}
