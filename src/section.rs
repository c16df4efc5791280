//! Resolution of the human-readable section (question) a field belongs to.
//!
//! Author-written forms do not share one labelling convention, so the label
//! is found by trying an ordered list of rules over the surrounding tree and
//! taking the first definite answer:
//!
//! 1. the caption of an enclosing group (`fieldset`/`legend`);
//! 2. for radios and checkboxes, the nearest heading back-referencing the
//!    field (`h1` for radios, `h2` for checkboxes), else the first such
//!    heading on the page;
//! 3. an explicit `label[for]`;
//! 4. nothing.
//!
//! Error events use a separate chain, see [`SectionResolver::resolve_error`].

use crate::dom::{DomNode, clean_text};
use crate::field::{ControlKind, FormField};

/// Grouping containers and the caption element that must lead them.
const CAPTIONED_GROUPS: &[(&str, &str)] = &[("fieldset", "legend"), ("figure", "figcaption")];

/// Everything a rule may look at.
pub struct RuleInput<'a, N> {
    pub root: N,
    pub control: Option<N>,
    pub field: &'a FormField,
    pub heading_reference_attribute: &'a str,
}

/// A single resolution rule: a definite answer or `None` to defer.
pub type SectionRule<N> = fn(&RuleInput<'_, N>) -> Option<String>;

/// Rules for response and change events, in priority order.
pub fn section_rules<N: DomNode>() -> [(&'static str, SectionRule<N>); 3] {
    [
        ("group caption", group_caption),
        ("heading", referenced_heading),
        ("label", explicit_label),
    ]
}

/// Rules for error events, in priority order.
pub fn error_section_rules<N: DomNode>() -> [(&'static str, SectionRule<N>); 2] {
    [("key marker", preceding_key), ("container text", container_text)]
}

/// Resolves section labels for fields.
#[derive(Debug, Clone)]
pub struct SectionResolver {
    heading_reference_attribute: String,
}

impl SectionResolver {
    /// `heading_reference_attribute` is the heading attribute that names the
    /// id of the field it introduces.
    pub fn new(heading_reference_attribute: impl Into<String>) -> Self {
        Self {
            heading_reference_attribute: heading_reference_attribute.into(),
        }
    }

    /// Section label for a response or change event.
    pub fn resolve<N: DomNode>(&self, root: N, field: &FormField) -> Option<String> {
        self.run(root, field, &section_rules())
    }

    /// Section label for an error event: a caption-like "key" element before
    /// the field's container, else the container's own text.
    pub fn resolve_error<N: DomNode>(&self, root: N, field: &FormField) -> Option<String> {
        self.run(root, field, &error_section_rules())
    }

    fn run<N: DomNode>(
        &self,
        root: N,
        field: &FormField,
        rules: &[(&'static str, SectionRule<N>)],
    ) -> Option<String> {
        let input = RuleInput {
            root,
            control: find_control(root, field),
            field,
            heading_reference_attribute: &self.heading_reference_attribute,
        };
        for (name, rule) in rules {
            if let Some(section) = rule(&input) {
                tracing::trace!("Section for {:?} resolved by {name} rule", field.id);
                return Some(section);
            }
        }
        tracing::trace!("No section found for {:?}", field.id);
        None
    }
}

impl Default for SectionResolver {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_HEADING_REFERENCE_ATTRIBUTE)
    }
}

/// The control a field was extracted from: by `id`, else the first element
/// carrying its `name`.
///
/// `scope` (usually the tracked form) is searched before the rest of the
/// document, so a page repeating ids across forms still finds the control
/// of the form being tracked.
pub fn find_control<N: DomNode>(scope: N, field: &FormField) -> Option<N> {
    first_with(scope, "id", &field.id)
        .or_else(|| scope.element_by_id(&field.id))
        .or_else(|| first_with(scope, "name", &field.name))
        .or_else(|| first_with(scope.document_root(), "name", &field.name))
}

/// First element at or below `scope` whose `attribute` equals `value`.
fn first_with<N: DomNode>(scope: N, attribute: &str, value: &str) -> Option<N> {
    if value.is_empty() {
        return None;
    }
    std::iter::once(scope)
        .chain(scope.descendant_nodes())
        .find(|n| n.attribute(attribute) == Some(value))
}

fn group_caption<N: DomNode>(input: &RuleInput<'_, N>) -> Option<String> {
    let control = input.control?;
    control.ancestor_nodes().into_iter().find_map(|ancestor| {
        let (_, caption_tag) = CAPTIONED_GROUPS
            .iter()
            .find(|(group, _)| ancestor.has_tag(group))?;
        let leading = ancestor.child_nodes().into_iter().find(|c| c.is_element())?;
        if !leading.has_tag(caption_tag) {
            return None;
        }
        clean_text(&leading.text_content())
    })
}

fn referenced_heading<N: DomNode>(input: &RuleInput<'_, N>) -> Option<String> {
    let level = match input.field.kind {
        ControlKind::RadioButtons => "h1",
        ControlKind::Checkbox => "h2",
        _ => return None,
    };
    let is_heading = |n: &N| n.has_tag(level);
    let references_field = |n: &N| {
        !input.field.id.is_empty()
            && n.attribute(input.heading_reference_attribute) == Some(input.field.id.as_str())
    };

    let scopes = match input.control {
        Some(control) => control.ancestor_nodes(),
        None => vec![input.root.document_root()],
    };
    let referenced = scopes.into_iter().find_map(|scope| {
        scope
            .descendant_nodes()
            .into_iter()
            .find(|n| is_heading(n) && references_field(n))
    });

    let heading = referenced.or_else(|| {
        input
            .root
            .document_root()
            .descendant_nodes()
            .into_iter()
            .find(is_heading)
    })?;
    clean_text(&heading.text_content())
}

fn explicit_label<N: DomNode>(input: &RuleInput<'_, N>) -> Option<String> {
    let id = input.field.id.as_str();
    if id.is_empty() {
        return None;
    }
    let label_in = |scope: N| {
        scope
            .descendant_nodes()
            .into_iter()
            .find(|n| n.has_tag("label") && n.attribute("for") == Some(id))
    };
    label_in(input.root)
        .or_else(|| label_in(input.root.document_root()))
        .and_then(|label| clean_text(&label.text_content()))
}

/// Class tokens that flag an element as the key/caption of a row.
fn is_key_marker<N: DomNode>(node: &N) -> bool {
    node.attribute("class").is_some_and(|classes| {
        classes
            .split_ascii_whitespace()
            .any(|c| c == "key" || c.ends_with("__key") || c.ends_with("-key"))
    })
}

fn preceding_key<N: DomNode>(input: &RuleInput<'_, N>) -> Option<String> {
    let container = input.control?.parent_node()?;
    let mut sibling = container.previous_sibling();
    while let Some(node) = sibling {
        if node.is_element() && is_key_marker(&node) {
            if let Some(text) = clean_text(&node.text_content()) {
                return Some(text);
            }
        }
        sibling = node.previous_sibling();
    }
    None
}

fn container_text<N: DomNode>(input: &RuleInput<'_, N>) -> Option<String> {
    let container = input.control?.parent_node()?;
    let direct: String = container
        .child_nodes()
        .iter()
        .filter_map(|n| n.own_text())
        .collect();
    clean_text(&direct)
}
