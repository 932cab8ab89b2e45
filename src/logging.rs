//! Structured logging setup
//!
//! stdout belongs to the status board, so logs go to a file when one is
//! given and to stderr otherwise.

use crate::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset and logs go to a file
const FILE_FILTER: &str = "info,proxy_board=debug";

/// Filter used when `RUST_LOG` is unset and logs share the terminal
const STDERR_FILTER: &str = "warn";

/// Install the global tracing subscriber
pub fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_filter = if log_file.is_some() {
        FILE_FILTER
    } else {
        STDERR_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);

    match log_file {
        Some(path) => {
            let file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {:?}", path))?;
            builder
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
            tracing::info!("logging initialized at {}", path.display());
        }
        None => {
            builder
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!(e))?;
        }
    }

    Ok(())
}
