//! Logging for the shelter pipeline.
//!
//! The pipeline core never writes to a global logger on its own. It receives a
//! [`LogSink`] and hands it pre-formatted lines. The binary wires in
//! [`TracingSink`], which forwards to `tracing`; tests use [`MemorySink`] to
//! capture exactly what would have been logged.

use std::sync::Mutex;

/// Width of the banner rule drawn by [`LogSink::header`]
pub const HEADER_WIDTH: usize = 60;

/// Destination for pipeline log lines
pub trait LogSink {
    /// Log one info-level line.
    fn info(&self, line: &str);

    /// Log a banner around `title`.
    fn header(&self, title: &str) {
        let rule = "=".repeat(HEADER_WIDTH);
        self.info(&rule);
        self.info(title);
        self.info(&rule);
    }
}

/// Sink that forwards every line to `tracing` at info level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// Sink that keeps every line in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all lines logged so far
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drop all captured lines
    pub fn clear(&self) {
        match self.lines.lock() {
            Ok(mut lines) => lines.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl LogSink for MemorySink {
    fn info(&self, line: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(line.to_string()),
            Err(poisoned) => poisoned.into_inner().push(line.to_string()),
        }
    }
}

/// Initializes process-wide logging to stderr.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` when
/// `debug` is true.
#[cfg(feature = "cli")]
pub fn init_logging(debug: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
