//! Builder for configuring a [`Tracker`].

use std::collections::HashMap;

use crate::consent::ConsentProvider;
use crate::error::{Result, TrackerError};
use crate::event::PATH_PART_COUNT;
use crate::handle::{InteractionHandler, InteractionKind, Tracker};
use crate::sanitizer::Sanitizer;
use crate::section::SectionResolver;
use crate::sink::EventSink;
use crate::validator::{RedactionOrder, Validator};

pub const DEFAULT_HEADING_REFERENCE_ATTRIBUTE: &str = "data-section-for";
pub const DEFAULT_ERROR_GROUP_CLASS: &str = "govuk-form-group--error";
pub const DEFAULT_ERROR_MESSAGE_CLASS: &str = "govuk-error-message";

/// Tunables shared by every tracking strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Bound for `text`, `section`, `action` and `type`.
    pub max_length: usize,
    /// Bound for `url` and `link_domain`.
    pub url_max_length: usize,
    /// Length of each `link_path_parts.N` chunk.
    pub path_part_length: usize,
    pub redaction_order: RedactionOrder,
    /// Heading attribute naming the id of the radio/checkbox it introduces.
    pub heading_reference_attribute: String,
    /// Class marking a form group that is currently showing an error.
    pub error_group_class: String,
    /// Class marking the error message inside such a group.
    pub error_message_class: String,
    /// Merge day/month/year controls into one field.
    pub combine_date_fields: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_length: 100,
            url_max_length: 1000,
            path_part_length: 100,
            redaction_order: RedactionOrder::default(),
            heading_reference_attribute: DEFAULT_HEADING_REFERENCE_ATTRIBUTE.to_string(),
            error_group_class: DEFAULT_ERROR_GROUP_CLASS.to_string(),
            error_message_class: DEFAULT_ERROR_MESSAGE_CLASS.to_string(),
            combine_date_fields: true,
        }
    }
}

impl TrackerConfig {
    fn check(&self) -> Result<()> {
        for (what, value) in [
            ("max_length", self.max_length),
            ("url_max_length", self.url_max_length),
            ("path_part_length", self.path_part_length),
        ] {
            if value == 0 {
                return Err(TrackerError::Config(format!("{what} must be positive")));
            }
        }
        if self.path_part_length.checked_mul(PATH_PART_COUNT).is_none() {
            return Err(TrackerError::Config(format!(
                "path_part_length {} is too large for {PATH_PART_COUNT} parts",
                self.path_part_length
            )));
        }
        for (what, value) in [
            ("heading_reference_attribute", &self.heading_reference_attribute),
            ("error_group_class", &self.error_group_class),
            ("error_message_class", &self.error_message_class),
        ] {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(TrackerError::Config(format!(
                    "{what} must be a single non-empty token, got {value:?}"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for a [`Tracker`].
///
/// The sink and consent provider are explicit: nothing is read from ambient
/// page state.
///
/// # Example
///
/// ```
/// use form_analytics::{ConsentFlag, MemorySink, RedactionOrder, TrackerBuilder};
///
/// let sink = MemorySink::new();
/// let tracker = TrackerBuilder::new(sink.clone(), ConsentFlag::granted())
///     .max_length(100)
///     .redaction_order(RedactionOrder::RedactFirst)
///     .heading_reference_attribute("data-question")
///     .build()
///     .unwrap();
/// # let _ = tracker;
/// ```
pub struct TrackerBuilder {
    sink: Box<dyn EventSink>,
    consent: Box<dyn ConsentProvider>,
    config: TrackerConfig,
    sanitizers: Vec<Box<dyn Sanitizer>>,
    handlers: HashMap<InteractionKind, Box<dyn InteractionHandler>>,
}

impl TrackerBuilder {
    /// Create a builder with default settings.
    pub fn new(
        sink: impl EventSink + 'static,
        consent: impl ConsentProvider + 'static,
    ) -> Self {
        Self {
            sink: Box::new(sink),
            consent: Box::new(consent),
            config: TrackerConfig::default(),
            sanitizers: Vec::new(),
            handlers: HashMap::new(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.config.max_length = length;
        self
    }

    pub fn url_max_length(mut self, length: usize) -> Self {
        self.config.url_max_length = length;
        self
    }

    pub fn path_part_length(mut self, length: usize) -> Self {
        self.config.path_part_length = length;
        self
    }

    pub fn redaction_order(mut self, order: RedactionOrder) -> Self {
        self.config.redaction_order = order;
        self
    }

    pub fn heading_reference_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config.heading_reference_attribute = attribute.into();
        self
    }

    pub fn error_group_class(mut self, class: impl Into<String>) -> Self {
        self.config.error_group_class = class.into();
        self
    }

    pub fn error_message_class(mut self, class: impl Into<String>) -> Self {
        self.config.error_message_class = class.into();
        self
    }

    pub fn combine_date_fields(mut self, enabled: bool) -> Self {
        self.config.combine_date_fields = enabled;
        self
    }

    /// Append a redaction pass that runs after the built-in ones.
    ///
    /// Sanitizers run in the order they are added, each receiving the output
    /// of the previous one.
    pub fn add_sanitizer(mut self, sanitizer: impl Sanitizer + 'static) -> Self {
        self.sanitizers.push(Box::new(sanitizer));
        self
    }

    /// Register a handler for an interaction kind, taking precedence over the
    /// built-in handling of that kind.
    pub fn handler(
        mut self,
        kind: InteractionKind,
        handler: impl InteractionHandler + 'static,
    ) -> Self {
        self.handlers.insert(kind, Box::new(handler));
        self
    }

    /// Validate the configuration and build the [`Tracker`].
    pub fn build(self) -> Result<Tracker> {
        self.config.check()?;

        let mut validator = Validator::new(self.config.redaction_order);
        for sanitizer in self.sanitizers {
            validator.add_sanitizer(sanitizer);
        }
        let resolver = SectionResolver::new(self.config.heading_reference_attribute.clone());

        Ok(Tracker::new(
            self.sink,
            self.consent,
            self.config,
            validator,
            resolver,
            self.handlers,
        ))
    }
}
