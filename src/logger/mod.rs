use std::sync::Mutex;

use anyhow::Result;

/// Per-probe sink for lines emitted while the check runs. Supplied by the
/// caller for each probe call; this component and the engine only write.
pub trait RecordLogger: Send + Sync {
    fn log(&self, line: &str) -> Result<()>;
}

/// Buffering logger for tests and local wiring.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl RecordLogger for MemoryLogger {
    fn log(&self, line: &str) -> Result<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
