// Tracing subscriber setup
//
// RUST_LOG wins when set. Otherwise the crate logs warnings, or debug
// output with --verbose.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "airwatch=debug" } else { "airwatch=warn" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into())
}

/// Log to stderr, for one-shot commands
pub fn init_stderr(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Log to a file, for the full-screen dashboard where stderr would
/// draw over the alternate screen
pub fn init_file(verbose: bool, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init();
    Ok(())
}
