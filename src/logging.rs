// src/logging.rs

//! Logging setup for `plotvisor` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. the level passed by the embedding binary (if provided)
//! 2. `PLOTVISOR_LOG` environment variable (e.g. "info", "debug")
//! 3. default to `info`
//!
//! Logs are sent to STDERR so that a terminal dashboard can own stdout.

use std::str::FromStr;

use anyhow::Result;
use tracing_subscriber::fmt;

/// Log level as chosen by the embedding binary.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!(
                "invalid log level: {other} (expected error, warn, info, debug or trace)"
            )),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Resolve the effective level without installing anything.
pub fn resolve_level(level: Option<LogLevel>) -> tracing::Level {
    match level {
        Some(lvl) => lvl.into(),
        None => std::env::var("PLOTVISOR_LOG")
            .ok()
            .and_then(|s| s.parse::<LogLevel>().ok())
            .map(tracing::Level::from)
            .unwrap_or(tracing::Level::INFO),
    }
}

/// Initialise global logging subscriber.
///
/// Safe to call once at startup; a second call reports an error instead of
/// panicking.
pub fn init_logging(level: Option<LogLevel>) -> Result<()> {
    fmt()
        .with_max_level(resolve_level(level))
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}
