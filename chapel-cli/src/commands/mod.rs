//! CLI command implementations

pub mod config;
pub mod group;
pub mod logs;
pub mod poll;
pub mod sms;
pub mod summary;
pub mod total;

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chapel_core::{ChapelContext, EntryPoint, LogEvent, LoggingService};

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let chapel_dir = get_chapel_dir();
    std::fs::create_dir_all(&chapel_dir).ok()?;
    LoggingService::new(&chapel_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// `$CHAPEL_DIR`, or `~/.chapel`
pub fn get_chapel_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CHAPEL_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .map(|home| home.join(".chapel"))
            .unwrap_or_else(|| PathBuf::from(".chapel"))
    }
}

pub fn get_context() -> Result<ChapelContext> {
    let chapel_dir = get_chapel_dir();
    std::fs::create_dir_all(&chapel_dir)
        .with_context(|| format!("Failed to create chapel directory: {:?}", chapel_dir))?;

    ChapelContext::new(&chapel_dir).context("Failed to load chapel configuration")
}

/// Read a snapshot from a file, or from stdin when it is piped
pub fn read_input(file: Option<&Path>, what: &str) -> Result<String> {
    if let Some(path) = file {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}: {:?}", what, path))
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .with_context(|| format!("Failed to read {} from stdin", what))?;
        Ok(buffer)
    } else {
        anyhow::bail!("No {} provided. Pass a file path or pipe JSON on stdin.", what);
    }
}
