//! Logging and tracing configuration
//!
//! The harness logs diagnostics to stderr so the report on stdout stays
//! clean (and parseable with `--json`). The mock backend additionally logs
//! to a file since it usually runs in the background.

use std::path::PathBuf;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

use super::paths;

/// Initialize tracing for the CLI (stderr logging)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
pub fn init_cli() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("harness=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing for the mock backend (file + stderr logging)
///
/// Logs go to `<data dir>/logs/mock_backend.log` through a non-blocking
/// writer, and to stderr. The returned guard must be held for the lifetime
/// of the process so buffered lines get flushed.
pub fn init_backend() -> (Option<PathBuf>, Option<WorkerGuard>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("harness=debug,mock_backend=debug,info"));

    if let Some(log_dir) = paths::log_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let appender = tracing_appender::rolling::never(&log_dir, "mock_backend.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let file_layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);

            tracing_subscriber::registry()
                .with(filter)
                .with(file_layer)
                .with(stderr_layer())
                .init();

            return (Some(log_dir.join("mock_backend.log")), Some(guard));
        }
    }

    // Fallback: stderr only
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer())
        .init();

    (None, None)
}

/// Compact stderr layer, built per subscriber stack
fn stderr_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_layer_stacks_alone_and_over_file_layer() {
        let dir = tempfile::tempdir().unwrap();
        let (writer, _guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir.path(), "t.log"));

        let with_file = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .with(stderr_layer());
        tracing::subscriber::with_default(with_file, || tracing::info!("file and stderr"));

        let alone = tracing_subscriber::registry()
            .with(EnvFilter::new("info"))
            .with(stderr_layer());
        tracing::subscriber::with_default(alone, || tracing::info!("stderr only"));
    }
}
