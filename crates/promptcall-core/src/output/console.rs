//! Console response sink

use std::io::Write;

use super::traits::ResponseSink;

/// A sink that writes fragments straight to stdout
///
/// Flushes after every fragment so partial progress is visible while a
/// handler is still running.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// Create a new console sink
    pub fn new() -> Self {
        Self
    }
}

impl ResponseSink for ConsoleSink {
    fn write(&self, fragment: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(fragment.as_bytes());
        let _ = stdout.flush();
    }
}
