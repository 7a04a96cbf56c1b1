//! Diagnostic logging.
//!
//! The terminal belongs to the UI, so logs only ever go to a file, and only
//! when one was configured. Without a log file no subscriber is installed and
//! every `tracing` macro is a no-op.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

const DEFAULT_FILTER: &str = "linear_tui=info,linear_core=info";

/// Flushes buffered log lines when dropped; hold it for the program lifetime.
pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber writing to `path`, if given.
pub fn init(path: Option<&Path>) -> Result<LogGuard> {
    let Some(path) = path else {
        return Ok(LogGuard { _file_guard: None });
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (subscriber, guard) = file_subscriber(path, filter)?;
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(LogGuard {
        _file_guard: Some(guard),
    })
}

fn file_subscriber(
    path: &Path,
    filter: EnvFilter,
) -> Result<(impl Subscriber + Send + Sync, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log path {} has no file name", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    Ok((tracing_subscriber::registry().with(filter).with(layer), guard))
}
