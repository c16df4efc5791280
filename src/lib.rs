//! # form_analytics
//!
//! Consent-gated analytics events for arbitrary HTML forms, with PII
//! redaction applied to every value before it leaves the page.
//!
//! ## Overview
//!
//! Given a snapshot of a page and an interaction (a form submission, a
//! control change, a form showing validation errors), a [`Tracker`] recovers
//! one [`FormField`] per logical question, works out which section each
//! belongs to, validates and redacts every value and appends one
//! [`EventRecord`] per field to an [`EventSink`].
//!
//! Free-text answers are never read: only the existence and kind of a text
//! field is reported. Checkbox, radio and list answers are reported by their
//! author-written label text.
//!
//! ## Quick start
//!
//! ```
//! use form_analytics::{ConsentFlag, MemorySink, Page, SubmissionContext, TrackerBuilder};
//!
//! let sink = MemorySink::new();
//! let tracker = TrackerBuilder::new(sink.clone(), ConsentFlag::granted())
//!     .build()
//!     .unwrap();
//!
//! let page = Page::parse(r#"
//!     <form action="/test-url">
//!       <label for="s">Pick one</label>
//!       <select id="s"><option>test value1</option><option selected>test value2</option></select>
//!     </form>"#);
//!
//! assert!(tracker.track_submit(&page, "form", &SubmissionContext::new()));
//! let record = &sink.records()[0];
//! assert_eq!(record.event_data.kind, "drop-down list");
//! assert_eq!(record.event_data.text, "test value2");
//! assert_eq!(record.event_data.link_path_part_1, "/test-url");
//! ```

pub mod config;
pub mod consent;
pub mod date;
pub mod dom;
pub mod error;
pub mod event;
pub mod extract;
pub mod field;
pub mod handle;
pub mod pipeline;
pub mod sanitizer;
pub mod section;
pub mod sink;
pub mod strategy;
pub mod validator;

pub use config::{TrackerBuilder, TrackerConfig};
pub use consent::{ConsentFlag, ConsentProvider};
pub use date::combine_date_fields;
pub use dom::{DomNode, Page};
pub use error::{Result, TrackerError};
pub use event::{EventAssembler, EventData, EventParts, EventRecord, LinkTarget};
pub use extract::{extract_fields, extract_scoped};
pub use field::{ControlKind, FormField};
pub use handle::{Interaction, InteractionHandler, InteractionKind, Tracker};
pub use pipeline::{FormExtractionPipeline, SubmissionContext};
pub use sanitizer::{ExclusiveSanitizer, RegexSanitizer, Sanitizer, SanitizerPipeline};
pub use section::SectionResolver;
pub use sink::{EventSink, JsonLinesSink, MemorySink};
pub use strategy::{ChangeStrategy, ErrorStrategy, EventStrategy, ResponseStrategy};
pub use validator::{RedactionOrder, SENTINEL, Validator, validate, validate_value};
