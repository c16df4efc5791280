//! Merging of day/month/year control triplets into a single date field.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::field::{ControlKind, FormField};

static DATE_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)(?:[-_](day|month|year)|\[(day|month|year)\])$")
        .expect("date part pattern is valid")
});

/// Which component of a composite date a control holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

/// Split a control id such as `dob-day` or `dob[year]` into its shared
/// prefix and date component.
pub fn date_part(id: &str) -> Option<(&str, DatePart)> {
    let caps = DATE_PART.captures(id)?;
    let prefix = caps.get(1)?.as_str();
    let part = match caps.get(2).or(caps.get(3))?.as_str() {
        "day" => DatePart::Day,
        "month" => DatePart::Month,
        _ => DatePart::Year,
    };
    Some((prefix, part))
}

/// Replace every set of two or more date components sharing a prefix with a
/// single field.
///
/// The merged field sits where its first component was, keeps that
/// component's `id` (so section lookups land on a real control), takes the
/// shared prefix as its `name`, reports the kind `date` and never carries a
/// value.
pub fn combine_date_fields(fields: Vec<FormField>) -> Vec<FormField> {
    let mut parts: HashMap<&str, HashSet<DatePart>> = HashMap::new();
    for field in &fields {
        if let Some((prefix, part)) = date_part(&field.id) {
            parts.entry(prefix).or_default().insert(part);
        }
    }
    let mergeable: HashSet<String> = parts
        .into_iter()
        .filter(|(_, found)| found.len() >= 2)
        .map(|(prefix, _)| prefix.to_string())
        .collect();

    if mergeable.is_empty() {
        return fields;
    }

    let mut emitted: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        let prefix = date_part(&field.id)
            .map(|(prefix, _)| prefix.to_string())
            .filter(|prefix| mergeable.contains(prefix));
        match prefix {
            Some(prefix) => {
                if emitted.insert(prefix.clone()) {
                    tracing::trace!("Merging date components under {prefix}");
                    out.push(FormField {
                        id: field.id,
                        name: prefix,
                        value: None,
                        kind: ControlKind::Other("date".to_string()),
                    });
                }
            }
            None => out.push(field),
        }
    }
    out
}
