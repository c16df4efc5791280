//! JSON-lines file sink.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Result, TrackerError};
use crate::event::EventRecord;
use crate::sink::EventSink;

/// Sink that appends each record as one line of JSON.
///
/// The file and its parent directories are created on the first push;
/// existing content is never truncated.
///
/// # Example
///
/// ```rust,no_run
/// use form_analytics::JsonLinesSink;
///
/// let sink = JsonLinesSink::new("/var/log/analytics/events.jsonl");
/// ```
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventSink for JsonLinesSink {
    fn push(&self, record: &EventRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| TrackerError::Sink(Box::new(e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| TrackerError::Sink(Box::new(e)))?;
        file.write_all(line.as_bytes())
            .map_err(|e| TrackerError::Sink(Box::new(e)))?;

        tracing::debug!("Appended event to {}", self.path.display());
        Ok(())
    }
}
