//! The tracking entry points and interaction dispatch.

use std::collections::HashMap;

use crate::config::TrackerConfig;
use crate::consent::ConsentProvider;
use crate::dom::{DomNode, Page};
use crate::error::Result;
use crate::extract::raw_kind;
use crate::pipeline::{FormExtractionPipeline, SubmissionContext};
use crate::section::SectionResolver;
use crate::sink::EventSink;
use crate::strategy::{ChangeStrategy, ErrorStrategy, ResponseStrategy};
use crate::validator::Validator;

/// Named interaction types the host reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Submit,
    Change,
    Error,
    Click,
    Toggle,
}

/// One interaction, as reported by the host.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub kind: InteractionKind,
    /// CSS selector for the element the interaction happened on: the form
    /// for `Submit`/`Error`, the control for `Change`.
    pub target: String,
    pub context: SubmissionContext,
}

impl Interaction {
    pub fn new(kind: InteractionKind, target: impl Into<String>, context: SubmissionContext) -> Self {
        Self {
            kind,
            target: target.into(),
            context,
        }
    }
}

/// Handler for an interaction kind, for collaborators that track things
/// this crate does not (navigation clicks, disclosure toggles).
///
/// Handlers run behind the same consent gate and error boundary as the
/// built-in ones.
pub trait InteractionHandler {
    /// Returns whether anything was tracked.
    fn handle(&self, page: &Page, interaction: &Interaction, sink: &dyn EventSink) -> Result<bool>;
}

/// Consent-gated form tracker.
///
/// Built with [`TrackerBuilder`](crate::TrackerBuilder). Every public entry
/// point checks consent first, never panics on bad input and reports a
/// runtime fault as `false` after logging it.
pub struct Tracker {
    sink: Box<dyn EventSink>,
    consent: Box<dyn ConsentProvider>,
    config: TrackerConfig,
    validator: Validator,
    resolver: SectionResolver,
    handlers: HashMap<InteractionKind, Box<dyn InteractionHandler>>,
}

impl Tracker {
    pub(crate) fn new(
        sink: Box<dyn EventSink>,
        consent: Box<dyn ConsentProvider>,
        config: TrackerConfig,
        validator: Validator,
        resolver: SectionResolver,
        handlers: HashMap<InteractionKind, Box<dyn InteractionHandler>>,
    ) -> Self {
        Self {
            sink,
            consent,
            config,
            validator,
            resolver,
            handlers,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Dispatch an interaction to its registered or built-in handler.
    pub fn handle(&self, page: &Page, interaction: &Interaction) -> bool {
        self.guarded(interaction.kind, || self.dispatch(page, interaction))
    }

    /// Track the answers of the form matched by `form_selector`.
    pub fn track_submit(&self, page: &Page, form_selector: &str, context: &SubmissionContext) -> bool {
        self.guarded(InteractionKind::Submit, || {
            self.submit(page, form_selector, context)
        })
    }

    /// Track a change to the control matched by `control_selector`.
    pub fn track_change(
        &self,
        page: &Page,
        control_selector: &str,
        context: &SubmissionContext,
    ) -> bool {
        self.guarded(InteractionKind::Change, || {
            self.change(page, control_selector, context)
        })
    }

    /// Track the validation errors shown in the form matched by
    /// `form_selector`.
    pub fn track_errors(&self, page: &Page, form_selector: &str, context: &SubmissionContext) -> bool {
        self.guarded(InteractionKind::Error, || {
            self.errors(page, form_selector, context)
        })
    }

    fn guarded(&self, kind: InteractionKind, track: impl FnOnce() -> Result<bool>) -> bool {
        if !self.consent.has_consent() {
            tracing::debug!("No analytics consent, ignoring {kind:?} interaction");
            return false;
        }
        match track() {
            Ok(tracked) => tracked,
            Err(e) => {
                tracing::error!("Failed to track {kind:?} interaction: {e}");
                false
            }
        }
    }

    fn dispatch(&self, page: &Page, interaction: &Interaction) -> Result<bool> {
        if let Some(handler) = self.handlers.get(&interaction.kind) {
            return handler.handle(page, interaction, self.sink.as_ref());
        }
        let target = interaction.target.as_str();
        let context = &interaction.context;
        match interaction.kind {
            InteractionKind::Submit => self.submit(page, target, context),
            InteractionKind::Change => self.change(page, target, context),
            InteractionKind::Error => self.errors(page, target, context),
            InteractionKind::Click | InteractionKind::Toggle => {
                tracing::debug!("No handler registered for {:?}", interaction.kind);
                Ok(false)
            }
        }
    }

    fn pipeline(&self) -> FormExtractionPipeline<'_> {
        FormExtractionPipeline::new(&self.config, &self.validator, &self.resolver)
    }

    fn submit(&self, page: &Page, selector: &str, context: &SubmissionContext) -> Result<bool> {
        let Some(form) = page.select_first(selector)? else {
            tracing::debug!("No form matches {selector:?}");
            return Ok(false);
        };
        let pushed = self
            .pipeline()
            .run(form, context, &ResponseStrategy, self.sink.as_ref())?;
        Ok(pushed > 0)
    }

    fn change(&self, page: &Page, selector: &str, context: &SubmissionContext) -> Result<bool> {
        let Some(control) = page.select_first(selector)? else {
            tracing::debug!("No control matches {selector:?}");
            return Ok(false);
        };
        if raw_kind(control).is_none() {
            tracing::debug!("{selector:?} is not a form control");
            return Ok(false);
        }
        let form = control
            .ancestor_nodes()
            .into_iter()
            .find(|n| n.has_tag("form"))
            .unwrap_or_else(|| control.document_root());
        let strategy = ChangeStrategy::for_control(control);
        let pushed = self
            .pipeline()
            .run(form, context, &strategy, self.sink.as_ref())?;
        Ok(pushed > 0)
    }

    fn errors(&self, page: &Page, selector: &str, context: &SubmissionContext) -> Result<bool> {
        let Some(form) = page.select_first(selector)? else {
            tracing::debug!("No form matches {selector:?}");
            return Ok(false);
        };
        let strategy = ErrorStrategy::new(
            self.config.error_group_class.as_str(),
            self.config.error_message_class.as_str(),
        );
        let pushed = self
            .pipeline()
            .run(form, context, &strategy, self.sink.as_ref())?;
        Ok(pushed > 0)
    }
}
