//! CLI command definitions
//!
//! Defines the clap commands for the harness CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the account/config suite against the backend
    Run {
        #[command(flatten)]
        target: Target,

        /// Print the result set as JSON on stdout (progress moves to stderr)
        #[arg(long)]
        json: bool,
    },

    /// Check that the backend answers
    Ping {
        #[command(flatten)]
        target: Target,
    },
}

/// Where to find the backend
#[derive(Args, Debug, Default)]
pub struct Target {
    /// Socket path (Unix) or pipe name (Windows) of the backend
    #[arg(long)]
    pub socket: Option<String>,

    /// Configuration file to use instead of the default one
    #[arg(long)]
    pub config: Option<PathBuf>,
}
