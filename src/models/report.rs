use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::Value;

/// Summary of one glitch operation, written as JSON with `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub operation: String,
    pub started_at: DateTime<Local>,
    pub elapsed_ms: u64,
    pub width: u32,
    pub height: u32,

    /// Operation-specific counters and statistics
    pub details: Value,
}

impl OperationReport {
    pub fn new(operation: impl Into<String>, started_at: DateTime<Local>) -> Self {
        Self {
            operation: operation.into(),
            started_at,
            elapsed_ms: 0,
            width: 0,
            height: 0,
            details: Value::Null,
        }
    }

    #[inline]
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    pub fn details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Stamp the elapsed time since `started_at`.
    pub fn finish(mut self) -> Self {
        let elapsed = Local::now().signed_duration_since(self.started_at);
        self.elapsed_ms = elapsed.num_milliseconds().max(0) as u64;
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
