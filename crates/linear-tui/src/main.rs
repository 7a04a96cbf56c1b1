use std::process::ExitCode;

use anyhow::{Context, Result};
use linear_core::config::Config;
use tokio::runtime::Runtime;

mod logging;
mod source;
mod tui;

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run() -> Result<()> {
    let config = Config::from_env()?;
    let _log_guard = logging::init(config.log_file.as_deref())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting linear-tui");

    let runtime = Runtime::new().context("failed to start async runtime")?;
    let result = runtime.block_on(tui::runner::run(&config));
    if let Err(err) = &result {
        tracing::warn!(error = %format!("{err:#}"), "exiting with error");
    }
    result
}
