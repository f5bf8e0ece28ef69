//! Logging init: file under the XDG state dir, or graceful fallback to stderr.
//!
//! User-facing running commentary goes to stdout via `println!`; tracing is
//! for diagnostics only.

use anyhow::Result;
use std::fs;
use std::io;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,shardstage=debug"))
}

/// Initialize structured logging to `~/.local/state/shardstage/shardstage.log`.
/// Returns Err if the log file cannot be opened so the caller can fall back
/// to stderr-only logging.
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("shardstage")?;
    let log_dir = xdg_dirs.get_state_home().join("shardstage");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("shardstage.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Each log line gets its own writer clone; if cloning the handle ever
    // fails, that line goes to stderr instead of being dropped.
    let writer = BoxMakeWriter::new(move || -> Box<dyn io::Write> {
        match file.try_clone() {
            Ok(f) => Box::new(f),
            Err(_) => Box::new(io::stderr()),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::info!("shardstage logging initialized at {}", log_path.display());
    Ok(())
}

/// Stderr-only logging. Used when `init_logging` fails so the CLI still runs.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
