//! Account harness CLI
//!
//! Runs integration checks against the account and configuration commands
//! of a desktop application's backend.

use std::process::ExitCode;

use clap::Parser;
use harness::{cli, commands::Commands, common::logging};

#[derive(Parser)]
#[command(name = "harness", about = "Integration checks for account/config commands")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    logging::init_cli();

    let cli = Cli::parse();

    match cli::dispatch(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
