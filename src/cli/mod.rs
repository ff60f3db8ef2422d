//! CLI command handling
//!
//! Connects to the backend, runs the requested command and formats output.

use std::process::ExitCode;

use colored::Colorize;

use crate::commands::{Commands, Target};
use crate::common::{config::Config, Result};
use crate::ipc::BackendClient;
use crate::testing::{self, Progress, Summary};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Run { target, json } => {
            let mut client = connect(&target).await?;

            let progress = if json {
                Progress::Stderr
            } else {
                Progress::Stdout
            };

            progress.emit(&"=".repeat(60));
            progress.emit(&format!("{}", "Account/config integration suite".bold()));
            progress.emit(&"=".repeat(60));

            let results = testing::run_all_tests_with(&mut client, progress).await;
            let summary = Summary::of(&results);
            testing::print_summary(&summary, progress);

            tracing::info!(
                passed = summary.passed,
                failed = summary.failed,
                skipped = summary.skipped,
                "Suite finished"
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }

            Ok(if results.all_passed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Ping { target } => {
            let mut client = connect(&target).await?;
            let accounts = client.ping().await?;
            println!("Backend is responding ({} accounts)", accounts);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn connect(target: &Target) -> Result<BackendClient> {
    let config = match &target.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let socket = config.socket(target.socket.as_deref());

    tracing::debug!(socket = %socket, "Connecting to backend");

    let client = BackendClient::connect(&socket, config.timeouts.connect()).await?;
    Ok(client.with_call_timeout(config.timeouts.call()))
}
