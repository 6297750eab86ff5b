//! Operator-facing log sink.
//!
//! The worker reports everything an operator might want to see through a [`RelayReporter`] rather than writing to a
//! global logger, so that a control surface can show the same messages (see the server's log buffer).
use std::fmt::Display;

use log::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait RelayReporter: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);

    /// Called whenever the processed order set grows. The default implementation does nothing.
    fn processed_count_changed(&self, count: usize) {
        let _ = count;
    }
}

/// Forwards reports to the `log` facade, under the `order_relay` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl RelayReporter for LogReporter {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!(target: "order_relay", "{message}"),
            LogLevel::Info => info!(target: "order_relay", "{message}"),
            LogLevel::Warning => warn!(target: "order_relay", "{message}"),
            LogLevel::Error => error!(target: "order_relay", "{message}"),
            LogLevel::Critical => error!(target: "order_relay", "🚨️ CRITICAL {message}"),
        }
    }

    fn processed_count_changed(&self, count: usize) {
        trace!(target: "order_relay", "Processed order count is now {count}");
    }
}
