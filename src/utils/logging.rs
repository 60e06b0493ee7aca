//! Diagnostic logging setup.
//!
//! The chat screen owns the terminal, so interactive sessions only log when a
//! file is given with `--log`. One-shot commands log warnings to stderr.

use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives are read from this variable, e.g. `LOCALCHAT_LOG=debug`.
pub const LOG_ENV: &str = "LOCALCHAT_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    Disabled,
}

impl LogTarget {
    /// Chat mode writes to `log_file` or nowhere; other commands use stderr.
    pub fn for_command(interactive: bool, log_file: Option<&Path>) -> Self {
        match (log_file, interactive) {
            (Some(path), _) => LogTarget::File(path.to_path_buf()),
            (None, true) => LogTarget::Disabled,
            (None, false) => LogTarget::Stderr,
        }
    }

    fn default_directive(&self) -> &'static str {
        match self {
            LogTarget::File(_) => "info",
            LogTarget::Stderr | LogTarget::Disabled => "warn",
        }
    }
}

pub fn build_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive))
}

pub fn open_log_file(path: &Path) -> Result<File, Box<dyn Error>> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| format!("Cannot open log file {}: {e}", path.display()))?;
    Ok(file)
}

/// Install the global subscriber for `target`.
pub fn init_logging(target: &LogTarget) -> Result<(), Box<dyn Error>> {
    let filter = build_filter(target.default_directive());
    match target {
        LogTarget::Disabled => Ok(()),
        LogTarget::Stderr => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
            Ok(())
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .try_init()?;
            Ok(())
        }
    }
}
