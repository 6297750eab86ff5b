//! An in-memory copy of the relay's log, for the `/logs` endpoint.
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::Local;
use order_relay_engine::{LogLevel, LogReporter, RelayReporter};

pub const DEFAULT_LOG_CAPACITY: usize = 1000;

/// Keeps the most recent relay log lines, formatted as `[YYYY-mm-dd HH:MM:SS] [LEVEL] message`. Every line is also
/// forwarded to the `log` facade. Clones share the same buffer.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))), capacity }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.lines.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn push(&self, level: LogLevel, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("[{timestamp}] [{level}] {message}");
        let mut lines = self.lock();
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }
}

impl RelayReporter for LogBuffer {
    fn log(&self, level: LogLevel, message: &str) {
        LogReporter.log(level, message);
        self.push(level, message);
    }

    fn processed_count_changed(&self, count: usize) {
        LogReporter.processed_count_changed(count);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lines_are_timestamped() {
        let buffer = LogBuffer::default();
        buffer.log(LogLevel::Warning, "Relay is stopping. Please wait.");
        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        // [2024-05-02 13:01:22] [WARNING] ...
        assert_eq!(&line[0..1], "[");
        assert_eq!(&line[20..22], "] ");
        assert!(line[1..20].chars().all(|c| c.is_ascii_digit() || "-: ".contains(c)));
        assert!(line.ends_with("[WARNING] Relay is stopping. Please wait."));
    }

    #[test]
    fn oldest_lines_are_dropped() {
        let buffer = LogBuffer::with_capacity(2);
        buffer.log(LogLevel::Info, "one");
        buffer.log(LogLevel::Info, "two");
        buffer.log(LogLevel::Error, "three");
        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[INFO] two"));
        assert!(lines[1].ends_with("[ERROR] three"));
        let clone = buffer.clone();
        clone.clear();
        assert!(buffer.lines().is_empty());
    }
}
