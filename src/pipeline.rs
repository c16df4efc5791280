//! The shared extraction pipeline behind every form interaction.
//!
//! extract → classify → merge dates → resolve section → validate → assemble
//! → push. Each field becomes one event, pushed in document order.

use url::Url;

use crate::config::TrackerConfig;
use crate::date::combine_date_fields;
use crate::dom::DomNode;
use crate::error::Result;
use crate::event::{EventAssembler, EventParts, LinkTarget};
use crate::section::SectionResolver;
use crate::sink::EventSink;
use crate::strategy::EventStrategy;
use crate::validator::Validator;

/// What the host knows about the interaction beyond the page itself.
#[derive(Debug, Clone, Default)]
pub struct SubmissionContext {
    /// Where the form posts to. Falls back to the form's `action`, then to
    /// the page URL.
    pub destination: Option<String>,
    /// Label of the triggering control. Falls back to the form's submit
    /// button.
    pub action_label: Option<String>,
    /// Whether the destination leaves the site, as decided by the host.
    pub external: bool,
    /// URL of the page, used to resolve relative destinations.
    pub page_url: Option<Url>,
}

impl SubmissionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn action_label(mut self, label: impl Into<String>) -> Self {
        self.action_label = Some(label.into());
        self
    }

    pub fn external(mut self, external: bool) -> Self {
        self.external = external;
        self
    }

    pub fn page_url(mut self, url: Url) -> Self {
        self.page_url = Some(url);
        self
    }
}

/// Runs one interaction through a strategy and into a sink.
pub struct FormExtractionPipeline<'a> {
    config: &'a TrackerConfig,
    validator: &'a Validator,
    resolver: &'a SectionResolver,
}

impl<'a> FormExtractionPipeline<'a> {
    pub fn new(
        config: &'a TrackerConfig,
        validator: &'a Validator,
        resolver: &'a SectionResolver,
    ) -> Self {
        Self {
            config,
            validator,
            resolver,
        }
    }

    /// Push one event per reported field and return how many were pushed.
    ///
    /// A sink failure stops the loop; events pushed before it stay pushed.
    pub fn run<N: DomNode, S: EventStrategy>(
        &self,
        form: N,
        context: &SubmissionContext,
        strategy: &S,
        sink: &dyn EventSink,
    ) -> Result<usize> {
        let mut fields = strategy.fields(form);
        if self.config.combine_date_fields {
            fields = combine_date_fields(fields);
        }
        let fields = strategy.select(fields);
        if fields.is_empty() {
            tracing::debug!("No trackable fields for {}", strategy.event_name());
            return Ok(0);
        }

        let action = strategy.action(form, context);
        let link = context
            .destination
            .clone()
            .or_else(|| form.attribute("action").map(str::to_string))
            .or_else(|| context.page_url.as_ref().map(Url::to_string))
            .map(|destination| LinkTarget::parse(&destination, context.page_url.as_ref()))
            .unwrap_or_default();

        let assembler = EventAssembler::new(self.validator, self.config);
        let mut pushed = 0;
        for field in &fields {
            let section = strategy.section(self.resolver, form, field);
            let text = strategy.text(form, field);
            let record = assembler.assemble(
                &EventParts {
                    event_name: strategy.event_name(),
                    kind: field.kind.as_str(),
                    text: text.as_deref(),
                    section: section.as_deref(),
                    action: action.as_deref(),
                    external: context.external,
                },
                &link,
            );
            sink.push(&record)?;
            pushed += 1;
        }

        tracing::debug!("Pushed {pushed} {} events", strategy.event_name());
        Ok(pushed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Page;
    use crate::sink::MemorySink;
    use crate::strategy::ResponseStrategy;
    use crate::validator::SENTINEL;

    fn run(html: &str, context: &SubmissionContext) -> MemorySink {
        let page = Page::parse(html);
        let form = page.select_first("form").unwrap().unwrap();
        let config = TrackerConfig::default();
        let validator = Validator::default();
        let resolver = SectionResolver::default();
        let sink = MemorySink::new();
        FormExtractionPipeline::new(&config, &validator, &resolver)
            .run(form, context, &ResponseStrategy, &sink)
            .unwrap();
        sink
    }

    #[test]
    fn one_event_per_field_in_document_order() {
        let sink = run(
            r#"<form action="/next">
                <label for="a">First</label><input type="text" id="a">
                <label for="b">Second</label><select id="b"><option>Yes</option></select>
            </form>"#,
            &SubmissionContext::new(),
        );
        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].event_data.section, "first");
        assert_eq!(records[0].event_data.text, SENTINEL);
        assert_eq!(records[1].event_data.section, "second");
        assert_eq!(records[1].event_data.text, "yes");
    }

    #[test]
    fn destination_falls_back_to_form_action_then_page() {
        let page_url = Url::parse("https://example.org/apply/step-1").unwrap();
        let ctx = SubmissionContext::new().page_url(page_url);

        let sink = run(r#"<form action="step-2"><input id="t"></form>"#, &ctx);
        assert_eq!(sink.records()[0].event_data.link_path_part_1, "/apply/step-2");

        let sink = run(r#"<form><input id="t"></form>"#, &ctx);
        assert_eq!(sink.records()[0].event_data.link_path_part_1, "/apply/step-1");
        assert_eq!(sink.records()[0].event_data.link_domain, "https://example.org");
    }

    #[test]
    fn date_triplet_produces_one_event() {
        let sink = run(
            r#"<form><fieldset><legend>Date of birth</legend>
                <input id="dob-day" name="dob-day" value="01">
                <input id="dob-month" name="dob-month" value="02">
                <input id="dob-year" name="dob-year" value="1990">
            </fieldset></form>"#,
            &SubmissionContext::new(),
        );
        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].event_data.kind, "date");
        assert_eq!(records[0].event_data.section, "date of birth");
        assert_eq!(records[0].event_data.text, SENTINEL);
    }

    #[test]
    fn empty_form_pushes_nothing() {
        let sink = run("<form></form>", &SubmissionContext::new());
        assert!(sink.is_empty());
    }
}
