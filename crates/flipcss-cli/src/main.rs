mod cli;

use clap::{CommandFactory, Parser};
use cli::{Cli, CliError};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    // Help exits 0, usage errors exit 2.
    let args = Cli::try_parse().unwrap_or_else(|err| err.exit());

    let outcome = args.into_request().and_then(|request| cli::run(&request));
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            if let CliError::InvalidArguments(_) = err {
                eprintln!("\n{}", Cli::command().render_help());
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("FLIPCSS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
