//! Field records and the control-kind classifier.

use std::fmt;

/// Semantic kind of a form control, as reported in the `type` attribute of
/// an event.
///
/// The set of raw control kinds is open; anything not recognised is carried
/// through verbatim in [`ControlKind::Other`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlKind {
    FreeText,
    DropDownList,
    Checkbox,
    RadioButtons,
    Other(String),
}

impl ControlKind {
    /// Map a raw control kind (`input` type, `select-one`, `textarea`, ...)
    /// to its semantic kind.
    pub fn classify(raw: &str) -> Self {
        match raw {
            "text" | "textarea" | "password" => Self::FreeText,
            "select-one" => Self::DropDownList,
            "checkbox" => Self::Checkbox,
            "radio" => Self::RadioButtons,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FreeText => "free text field",
            Self::DropDownList => "drop-down list",
            Self::Checkbox => "checkbox",
            Self::RadioButtons => "radio buttons",
            Self::Other(raw) => raw,
        }
    }

    /// Controls that are merged by `name` into a single field.
    pub fn is_grouped(&self) -> bool {
        matches!(self, Self::Checkbox | Self::RadioButtons)
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical answer recovered from a form.
///
/// Grouped checkbox/radio controls are identified by `name`; every other
/// field by `id`. `value` is only ever populated for bounded-choice controls
/// (checkboxes, radios and lists), whose possible values are author-written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub id: String,
    pub name: String,
    pub value: Option<String>,
    pub kind: ControlKind,
}

impl FormField {
    /// The value that may leave the page. Free-text fields never report one.
    pub fn reportable_value(&self) -> Option<&str> {
        match self.kind {
            ControlKind::FreeText => None,
            _ => self.value.as_deref(),
        }
    }
}
