use std::fs;
use std::path::Path;
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global tracing subscriber: a daily rolling file under `logs/`
/// plus an optional stdout layer. `LOG_LEVEL` in the environment takes
/// precedence over `default_filter`.
///
/// The returned guard must be kept alive for the lifetime of the process,
/// otherwise buffered lines are lost.
pub fn init_logging(log_file: &str, default_filter: &str, log_to_stdout: bool) -> WorkerGuard {
    let log_dir = Path::new("logs");
    fs::create_dir_all(log_dir).ok();

    let file_appender = rolling::daily(log_dir, log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter =
        EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    let installed = if log_to_stdout {
        let stdout_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true)
            .with_thread_ids(true);
        registry.with(stdout_layer).try_init()
    } else {
        registry.try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }

    guard
}
