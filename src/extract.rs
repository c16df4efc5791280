//! Recovery of [`FormField`] records from a form's controls.

use std::collections::HashMap;

use crate::dom::{DomNode, clean_text};
use crate::field::{ControlKind, FormField};
use crate::validator::SENTINEL;

/// Raw kinds that never produce a field.
const SKIPPED_KINDS: &[&str] = &["hidden", "fieldset", "submit", "button", "image", "reset"];

/// The raw control kind of an interactive element, mirroring what a browser
/// reports as the control's `type`. Non-controls return `None`.
pub fn raw_kind<N: DomNode>(node: N) -> Option<String> {
    let tag = node.tag()?.to_ascii_lowercase();
    let kind = match tag.as_str() {
        "input" => node
            .attribute("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string()),
        "select" if node.attribute("multiple").is_some() => "select-multiple".to_string(),
        "select" => "select-one".to_string(),
        "textarea" => "textarea".to_string(),
        "fieldset" => "fieldset".to_string(),
        "button" => node
            .attribute("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_else(|| "submit".to_string()),
        _ => return None,
    };
    Some(kind)
}

/// Interactive controls below `container`, in document order.
pub fn controls<N: DomNode>(container: N) -> Vec<N> {
    container
        .descendant_nodes()
        .into_iter()
        .filter(|n| raw_kind(*n).is_some())
        .collect()
}

/// Extract every trackable field of a form.
///
/// A missing form yields an empty list, which callers treat as "nothing to
/// track".
pub fn extract_fields<N: DomNode>(form: Option<N>) -> Vec<FormField> {
    match form {
        Some(form) => fields_from_controls(controls(form)),
        None => Vec::new(),
    }
}

/// Extract only the fields whose controls sit inside one of `scopes`.
///
/// Used to restrict extraction to the groups currently showing an error.
pub fn extract_scoped<N: DomNode>(scopes: &[N]) -> Vec<FormField> {
    let mut seen: Vec<N> = Vec::new();
    for scope in scopes {
        for control in controls(*scope) {
            if !seen.iter().any(|s| s.same_node(&control)) {
                seen.push(control);
            }
        }
    }
    fields_from_controls(seen)
}

fn fields_from_controls<N: DomNode>(controls: Vec<N>) -> Vec<FormField> {
    let mut fields: Vec<FormField> = Vec::new();
    let mut groups: HashMap<String, usize> = HashMap::new();

    for control in controls {
        let Some(raw) = raw_kind(control) else {
            continue;
        };
        if SKIPPED_KINDS.contains(&raw.as_str()) {
            continue;
        }

        let kind = ControlKind::classify(&raw);
        let id = control.attribute("id").unwrap_or_default().to_string();
        let name = control.attribute("name").unwrap_or_default().to_string();

        if kind.is_grouped() {
            let contribution = checked_contribution(control);
            if !name.is_empty() {
                if let Some(&index) = groups.get(&name) {
                    if let Some(label) = contribution {
                        let field = &mut fields[index];
                        field.value = Some(match field.value.take() {
                            Some(existing) => format!("{existing}, {label}"),
                            None => label,
                        });
                    }
                    continue;
                }
                groups.insert(name.clone(), fields.len());
            }
            fields.push(FormField {
                id,
                name,
                value: contribution,
                kind,
            });
            continue;
        }

        let value = match raw.as_str() {
            "select-one" => selected_options(control, false).into_iter().next(),
            "select-multiple" => {
                let selected = selected_options(control, true);
                (!selected.is_empty()).then(|| selected.join(", "))
            }
            _ => None,
        };

        fields.push(FormField {
            id,
            name,
            value,
            kind,
        });
    }

    tracing::trace!("Extracted {} fields", fields.len());
    fields
}

/// Label text of a checked box/radio, or the sentinel when it has none.
fn checked_contribution<N: DomNode>(control: N) -> Option<String> {
    control
        .attribute("checked")
        .map(|_| label_text(control).unwrap_or_else(|| SENTINEL.to_string()))
}

/// Text of the label associated with a control: an explicit `label[for]`
/// first, then a wrapping `label`.
pub fn label_text<N: DomNode>(control: N) -> Option<String> {
    if let Some(id) = control.attribute("id").filter(|id| !id.is_empty()) {
        let explicit = control
            .document_root()
            .descendant_nodes()
            .into_iter()
            .find(|n| n.has_tag("label") && n.attribute("for") == Some(id));
        if let Some(label) = explicit {
            return clean_text(&label.text_content());
        }
    }
    control
        .ancestor_nodes()
        .into_iter()
        .find(|n| n.has_tag("label"))
        .and_then(|label| clean_text(&label.text_content()))
}

/// Displayed text of the selected option(s) of a list control.
///
/// A single-selection list with nothing explicitly selected shows its first
/// option; when several carry `selected`, the last one wins.
fn selected_options<N: DomNode>(select: N, multiple: bool) -> Vec<String> {
    let options: Vec<N> = select
        .descendant_nodes()
        .into_iter()
        .filter(|n| n.has_tag("option"))
        .collect();
    let selected: Vec<N> = options
        .iter()
        .copied()
        .filter(|o| o.attribute("selected").is_some())
        .collect();

    let chosen: Vec<N> = if multiple {
        selected
    } else {
        selected
            .last()
            .or(options.first())
            .copied()
            .into_iter()
            .collect()
    };

    chosen
        .into_iter()
        .filter_map(|o| clean_text(&o.text_content()))
        .collect()
}
