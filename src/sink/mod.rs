//! Destinations for assembled events.
//!
//! The crate ships with two sinks:
//!
//! - [`MemorySink`] -- an in-process, append-only log (the page's data layer).
//! - [`JsonLinesSink`] -- appends one JSON object per line to a file.
//!
//! Implement the [`EventSink`] trait to hand events to anything else.

mod jsonl;

pub use jsonl::JsonLinesSink;

use std::cell::{OnceCell, Ref, RefCell};
use std::rc::Rc;

use crate::error::{Result, TrackerError};
use crate::event::EventRecord;

/// An ordered, append-only destination for event records.
///
/// # Implementing a custom sink
///
/// ```
/// use form_analytics::{EventRecord, EventSink, Result};
///
/// struct StdoutSink;
///
/// impl EventSink for StdoutSink {
///     fn push(&self, record: &EventRecord) -> Result<()> {
///         println!("{}", serde_json::to_string(record)?);
///         Ok(())
///     }
/// }
/// ```
pub trait EventSink {
    /// Append one record to the end of the log.
    fn push(&self, record: &EventRecord) -> Result<()>;
}

/// Shared in-memory event log.
///
/// The log is created empty on first use and only ever appended to; clones
/// share the same log, so a host can keep one clone to read what was pushed.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    log: Rc<OnceCell<RefCell<Vec<EventRecord>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self) -> &RefCell<Vec<EventRecord>> {
        self.log.get_or_init(|| RefCell::new(Vec::new()))
    }

    /// Whether anything has touched the log yet.
    pub fn is_created(&self) -> bool {
        self.log.get().is_some()
    }

    pub fn len(&self) -> usize {
        self.log().borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read access to everything pushed so far, in push order.
    pub fn records(&self) -> Ref<'_, Vec<EventRecord>> {
        self.log().borrow()
    }
}

impl EventSink for MemorySink {
    /// Fails instead of panicking while a [`records`](MemorySink::records)
    /// guard is held.
    fn push(&self, record: &EventRecord) -> Result<()> {
        let mut log = self
            .log()
            .try_borrow_mut()
            .map_err(|e| TrackerError::Sink(Box::new(e)))?;
        log.push(record.clone());
        Ok(())
    }
}
