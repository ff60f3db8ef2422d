//! Mock backend binary for integration testing
//!
//! Serves the in-memory account/config store over the harness IPC
//! transport, so the CLI can be exercised without the real application.

use std::collections::HashSet;
use std::time::Duration;

use clap::Parser;
use harness::backend::{Faults, MemoryBackend};
use harness::common::{logging, paths};
use harness::ipc::{server, transport};

#[derive(Parser)]
#[command(name = "mock_backend", about = "In-memory account/config backend")]
struct Args {
    /// Socket path (Unix) or pipe name (Windows) to listen on
    #[arg(long)]
    socket: Option<String>,

    /// Make the named command fail (repeatable)
    #[arg(long = "fail")]
    fail: Vec<String>,

    /// Answer add_account without an id
    #[arg(long)]
    omit_account_id: bool,

    /// Accept switch_account without switching
    #[arg(long)]
    ignore_switch: bool,

    /// Accept delete_account without deleting
    #[arg(long)]
    ignore_delete: bool,

    /// Store something other than what save_config received
    #[arg(long)]
    mangle_config: bool,

    /// Answer list_accounts with an object instead of an array
    #[arg(long)]
    malformed_list: bool,

    /// Stall a command before answering, as `<command>:<millis>` (repeatable)
    #[arg(long = "delay", value_parser = parse_delay)]
    delay: Vec<(String, Duration)>,
}

fn parse_delay(s: &str) -> Result<(String, Duration), String> {
    let (command, millis) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <command>:<millis>, got '{s}'"))?;
    let millis: u64 = millis
        .parse()
        .map_err(|e| format!("invalid delay '{millis}': {e}"))?;
    Ok((command.to_string(), Duration::from_millis(millis)))
}

#[tokio::main]
async fn main() {
    let (log_path, _guard) = logging::init_backend();
    let args = Args::parse();

    let socket = args.socket.unwrap_or_else(paths::socket_name);
    let faults = Faults {
        fail: args.fail.into_iter().collect::<HashSet<_>>(),
        omit_account_id: args.omit_account_id,
        ignore_switch: args.ignore_switch,
        ignore_delete: args.ignore_delete,
        mangle_saved_config: args.mangle_config,
        malformed_list: args.malformed_list,
        delays: args.delay.into_iter().collect(),
    };

    tracing::info!(
        socket = %socket,
        log = ?log_path,
        pid = std::process::id(),
        "Starting mock backend"
    );

    let listener = match transport::create_listener(&socket).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Error: failed to listen on {}: {}", socket, e);
            std::process::exit(1);
        }
    };

    let mut backend = MemoryBackend::new(faults);
    if let Err(e) = server::serve(listener, &mut backend, shutdown_signal()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let _ = paths::remove_socket(std::path::Path::new(&socket));
    tracing::info!("Mock backend shutdown complete");
}

/// Resolves on Ctrl+C, or SIGTERM on Unix
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
                    _ = tokio::signal::ctrl_c() => tracing::info!("Received SIGINT"),
                }
            }
            Err(e) => {
                tracing::warn!("Could not install SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
