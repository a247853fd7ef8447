//! Per-request logging.
//!
//! The builder holds an explicit `Logger` and a `LogLevel` filter. A message
//! is written only when a logger is configured and the message's level is at
//! or below the filter. Nothing here installs a global subscriber.

use std::fmt;

/// Verbosity levels, ordered from quietest to noisiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    /// Errors only.
    #[default]
    Errors,
    /// One line per request and per response body.
    Verbose,
    /// Transport construction and dial events as well.
    Debug,
    /// Everything.
    Everything,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Errors => "ERRORS",
            LogLevel::Verbose => "VERBOSE",
            LogLevel::Debug => "DEBUG",
            LogLevel::Everything => "EVERYTHING",
        };
        f.write_str(name)
    }
}

/// Sink for request log lines.
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, label: &str, message: &str);
}

impl<L: Logger + ?Sized> Logger for std::sync::Arc<L> {
    fn log(&self, level: LogLevel, label: &str, message: &str) {
        (**self).log(level, label, message)
    }
}

/// Forwards log lines to `tracing`, with the request label as a field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, label: &str, message: &str) {
        match level {
            LogLevel::Errors => tracing::error!(label, "{message}"),
            LogLevel::Verbose => tracing::info!(label, "{message}"),
            LogLevel::Debug => tracing::debug!(label, "{message}"),
            LogLevel::Everything => tracing::trace!(label, "{message}"),
        }
    }
}
