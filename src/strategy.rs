//! Per-interaction event strategies.
//!
//! A strategy decides which fields an interaction reports on and how each
//! field maps onto an event's name, text, section and action. The shared
//! processing lives in [`FormExtractionPipeline`](crate::FormExtractionPipeline).

use crate::date::date_part;
use crate::dom::{DomNode, clean_text};
use crate::extract::{extract_fields, extract_scoped, raw_kind};
use crate::field::FormField;
use crate::pipeline::SubmissionContext;
use crate::section::{SectionResolver, find_control};

/// How one kind of interaction becomes events.
pub trait EventStrategy {
    /// The `event_name` of every event produced.
    fn event_name(&self) -> &str;

    /// Candidate fields, in document order.
    fn fields<N: DomNode>(&self, form: N) -> Vec<FormField>;

    /// The candidates this interaction reports on. Runs after date parts
    /// have been merged.
    fn select(&self, fields: Vec<FormField>) -> Vec<FormField> {
        fields
    }

    fn section<N: DomNode>(
        &self,
        resolver: &SectionResolver,
        root: N,
        field: &FormField,
    ) -> Option<String> {
        resolver.resolve(root, field)
    }

    fn text<N: DomNode>(&self, root: N, field: &FormField) -> Option<String>;

    fn action<N: DomNode>(&self, form: N, context: &SubmissionContext) -> Option<String>;
}

/// Answers given when a form is submitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseStrategy;

impl EventStrategy for ResponseStrategy {
    fn event_name(&self) -> &str {
        "form_response"
    }

    fn fields<N: DomNode>(&self, form: N) -> Vec<FormField> {
        extract_fields(Some(form))
    }

    fn text<N: DomNode>(&self, _root: N, field: &FormField) -> Option<String> {
        field.reportable_value().map(str::to_string)
    }

    fn action<N: DomNode>(&self, form: N, context: &SubmissionContext) -> Option<String> {
        context
            .action_label
            .clone()
            .or_else(|| submit_label(form))
    }
}

/// Validation errors currently shown on a form.
#[derive(Debug, Clone)]
pub struct ErrorStrategy {
    group_class: String,
    message_class: String,
}

impl ErrorStrategy {
    /// `group_class` marks a form group in error, `message_class` the error
    /// message inside it.
    pub fn new(group_class: impl Into<String>, message_class: impl Into<String>) -> Self {
        Self {
            group_class: group_class.into(),
            message_class: message_class.into(),
        }
    }

    fn error_groups<N: DomNode>(&self, form: N) -> Vec<N> {
        std::iter::once(form)
            .chain(form.descendant_nodes())
            .filter(|n| n.has_class(&self.group_class))
            .collect()
    }
}

impl EventStrategy for ErrorStrategy {
    fn event_name(&self) -> &str {
        "form_error"
    }

    fn fields<N: DomNode>(&self, form: N) -> Vec<FormField> {
        extract_scoped(&self.error_groups(form))
    }

    fn section<N: DomNode>(
        &self,
        resolver: &SectionResolver,
        root: N,
        field: &FormField,
    ) -> Option<String> {
        resolver.resolve_error(root, field)
    }

    /// The author-written error message of the field's group.
    fn text<N: DomNode>(&self, root: N, field: &FormField) -> Option<String> {
        let control = find_control(root, field)?;
        let group = control
            .ancestor_nodes()
            .into_iter()
            .find(|n| n.has_class(&self.group_class))?;
        let message = group
            .descendant_nodes()
            .into_iter()
            .find(|n| n.has_class(&self.message_class))?;
        clean_text(&message.text_content())
    }

    fn action<N: DomNode>(&self, _form: N, _context: &SubmissionContext) -> Option<String> {
        Some("error".to_string())
    }
}

/// A single control changing value.
#[derive(Debug, Clone)]
pub struct ChangeStrategy {
    control_id: String,
    control_name: String,
}

impl ChangeStrategy {
    /// Strategy reporting on the field that `control` belongs to.
    pub fn for_control<N: DomNode>(control: N) -> Self {
        Self {
            control_id: control.attribute("id").unwrap_or_default().to_string(),
            control_name: control.attribute("name").unwrap_or_default().to_string(),
        }
    }

    fn is_changed(&self, field: &FormField) -> bool {
        if field.kind.is_grouped() && !self.control_name.is_empty() {
            return field.name == self.control_name;
        }
        if field.kind.as_str() == "date" {
            if let Some((prefix, _)) = date_part(&self.control_id) {
                return field.name == prefix;
            }
        }
        !self.control_id.is_empty() && field.id == self.control_id
    }
}

impl EventStrategy for ChangeStrategy {
    fn event_name(&self) -> &str {
        "form_change"
    }

    fn fields<N: DomNode>(&self, form: N) -> Vec<FormField> {
        extract_fields(Some(form))
    }

    fn select(&self, fields: Vec<FormField>) -> Vec<FormField> {
        fields
            .into_iter()
            .filter(|f| self.is_changed(f))
            .take(1)
            .collect()
    }

    fn text<N: DomNode>(&self, _root: N, field: &FormField) -> Option<String> {
        field.reportable_value().map(str::to_string)
    }

    fn action<N: DomNode>(&self, _form: N, context: &SubmissionContext) -> Option<String> {
        context
            .action_label
            .clone()
            .or_else(|| Some("change".to_string()))
    }
}

/// Label of the form's submit control: a submit `button`'s text or a submit
/// `input`'s `value`.
pub fn submit_label<N: DomNode>(form: N) -> Option<String> {
    form.descendant_nodes().into_iter().find_map(|n| {
        if raw_kind(n).as_deref() != Some("submit") {
            return None;
        }
        if n.has_tag("button") {
            clean_text(&n.text_content())
        } else {
            n.attribute("value").and_then(clean_text)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::combine_date_fields;
    use crate::dom::Page;

    #[test]
    fn response_uses_context_label_then_submit_button() {
        let page = Page::parse(
            r#"<form><input type="radio" name="r" id="r" checked><button>Save and continue</button></form>"#,
        );
        let form = page.select_first("form").unwrap().unwrap();
        let ctx = SubmissionContext::new();
        assert_eq!(
            ResponseStrategy.action(form, &ctx).as_deref(),
            Some("Save and continue")
        );
        let ctx = SubmissionContext::new().action_label("Send");
        assert_eq!(ResponseStrategy.action(form, &ctx).as_deref(), Some("Send"));
    }

    #[test]
    fn submit_input_value_is_a_label() {
        let page = Page::parse(
            r#"<form><button type="button">Add another</button><input type="submit" value="Apply"></form>"#,
        );
        let form = page.select_first("form").unwrap().unwrap();
        assert_eq!(submit_label(form).as_deref(), Some("Apply"));
    }

    #[test]
    fn error_strategy_scopes_and_reads_messages() {
        let page = Page::parse(
            r#"<form>
                <div class="govuk-form-group govuk-form-group--error">
                    <label for="email">Email address</label>
                    <p class="govuk-error-message">Enter an email address</p>
                    <input type="email" id="email" name="email">
                </div>
                <div class="govuk-form-group">
                    <input type="text" id="fine" name="fine">
                </div>
            </form>"#,
        );
        let form = page.select_first("form").unwrap().unwrap();
        let strategy = ErrorStrategy::new("govuk-form-group--error", "govuk-error-message");
        let fields = strategy.fields(form);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].id, "email");
        assert_eq!(
            strategy.text(page.root(), &fields[0]).as_deref(),
            Some("Enter an email address")
        );
    }

    #[test]
    fn change_strategy_picks_the_changed_group() {
        let page = Page::parse(
            r#"<form>
                <input type="text" id="name">
                <input type="checkbox" id="a" name="opts" checked><label for="a">A</label>
                <input type="checkbox" id="b" name="opts" checked><label for="b">B</label>
            </form>"#,
        );
        let form = page.select_first("form").unwrap().unwrap();
        let changed = page.select_first("#b").unwrap().unwrap();
        let strategy = ChangeStrategy::for_control(changed);
        let fields = strategy.select(strategy.fields(form));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "opts");
        assert_eq!(strategy.text(form, &fields[0]).as_deref(), Some("A, B"));
        assert_eq!(
            strategy.action(form, &SubmissionContext::new()).as_deref(),
            Some("change")
        );
    }

    #[test]
    fn change_on_a_date_part_selects_the_merged_field() {
        let page = Page::parse(
            r#"<form>
                <input id="dob-day" name="dob-day">
                <input id="dob-month" name="dob-month">
                <input id="dob-year" name="dob-year">
                <input id="visit-day" name="visit-day">
                <input id="visit-month" name="visit-month">
            </form>"#,
        );
        let form = page.select_first("form").unwrap().unwrap();
        let changed = page.select_first("#dob-month").unwrap().unwrap();
        let strategy = ChangeStrategy::for_control(changed);
        let fields = strategy.select(combine_date_fields(strategy.fields(form)));
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "dob");
        assert_eq!(fields[0].kind.as_str(), "date");

        let unmerged = strategy.select(strategy.fields(form));
        assert_eq!(unmerged.len(), 1);
        assert_eq!(unmerged[0].id, "dob-month");
    }
}
