//! Type/length validation and PII redaction for every outgoing value.
//!
//! Every string that ends up in an event passes through [`Validator`]:
//!
//! 1. absent, empty or non-string input becomes [`SENTINEL`];
//! 2. the text is lower-cased;
//! 3. redaction passes run in fixed priority: email addresses, then account
//!    tokens in query strings, then exactly one of date / postcode / phone
//!    number (the first category that matches);
//! 4. the result is bounded to the requested length.
//!
//! Steps 3 and 4 swap places under [`RedactionOrder::TruncateFirst`].

use std::sync::LazyLock;

use serde_json::Value;

use crate::sanitizer::{ExclusiveSanitizer, RegexSanitizer, Sanitizer, SanitizerPipeline};

/// Stand-in for any absent, invalid or redacted value.
pub const SENTINEL: &str = "undefined";

const MONTHS: &str = "(?:jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)";

static DEFAULT_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::default);

/// When length bounding happens relative to redaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RedactionOrder {
    /// Redact the whole value, then bound it. A pattern can never be cut in
    /// half before it is recognised.
    #[default]
    RedactFirst,
    /// Bound first, then redact. Matches the behaviour of existing
    /// dashboards' data but can let PII straddling the cut through.
    TruncateFirst,
}

/// Validates and redacts values before they are placed in an event.
pub struct Validator {
    order: RedactionOrder,
    redactions: SanitizerPipeline,
}

impl Validator {
    /// A validator with the built-in redaction passes.
    pub fn new(order: RedactionOrder) -> Self {
        Self {
            order,
            redactions: builtin_redactions(),
        }
    }

    /// Append an extra redaction pass after the built-in ones.
    pub fn add_sanitizer(&mut self, sanitizer: Box<dyn Sanitizer>) {
        self.redactions.add_boxed(sanitizer);
    }

    pub fn order(&self) -> RedactionOrder {
        self.order
    }

    /// Validate a possibly-absent string and bound it to `max_length`
    /// characters.
    pub fn validate(&self, value: Option<&str>, max_length: usize) -> String {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return SENTINEL.to_string();
        };
        match self.order {
            RedactionOrder::RedactFirst => {
                let redacted = self.redactions.sanitize(&value.to_lowercase());
                truncate(&redacted, max_length)
            }
            RedactionOrder::TruncateFirst => {
                let bounded = truncate(value, max_length).to_lowercase();
                self.redactions.sanitize(&bounded)
            }
        }
    }

    /// Validate an untyped value. Anything other than a non-empty JSON
    /// string becomes [`SENTINEL`].
    pub fn validate_value(&self, value: &Value, max_length: usize) -> String {
        match value {
            Value::String(s) => self.validate(Some(s), max_length),
            _ => SENTINEL.to_string(),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RedactionOrder::default())
    }
}

/// Validate with the default validator.
///
/// ```
/// use form_analytics::validate;
///
/// assert_eq!(validate(Some("fabien@gov.uk"), 100), "[email]");
/// assert_eq!(validate(Some("Continue"), 100), "continue");
/// assert_eq!(validate(None, 100), "undefined");
/// ```
pub fn validate(value: Option<&str>, max_length: usize) -> String {
    DEFAULT_VALIDATOR.validate(value, max_length)
}

/// Validate an untyped value with the default validator.
pub fn validate_value(value: &Value, max_length: usize) -> String {
    DEFAULT_VALIDATOR.validate_value(value, max_length)
}

fn truncate(value: &str, max_length: usize) -> String {
    value.chars().take(max_length).collect()
}

fn builtin_redactions() -> SanitizerPipeline {
    let mut pipeline = SanitizerPipeline::new();

    pipeline.add(RegexSanitizer::new(vec![(
        r"[^\s=/?&#+]+(?:@|%40)[^\s=/?&+]+",
        "[email]",
    )]));

    pipeline.add(RegexSanitizer::new(vec![
        (
            r"reset_password_token=[a-z0-9\-_]+",
            "reset_password_token=[reset_password_token]",
        ),
        (r"unlock_token=[a-z0-9\-_]+", "unlock_token=[unlock_token]"),
        (r"\bstate=[^&\s]+", "state=[state]"),
    ]));

    let day_month = format!(r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+{MONTHS}\s+\d{{4}}\b");
    let month_day = format!(r"\b{MONTHS}\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b");
    let dates = RegexSanitizer::category(
        "[date]",
        &[
            r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{4}\b",
            r"\b\d{4}[/\-]\d{1,2}[/\-]\d{1,2}\b",
            r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{2}\b",
            day_month.as_str(),
            month_day.as_str(),
        ],
    );
    let postcodes = RegexSanitizer::category(
        "[postcode]",
        &[r"\b[a-pr-uwyz][a-hk-y]?\d[a-hjkmnpr-y\d]?\s*\d[abd-hjlnp-uw-z]{2}\b"],
    );
    let phone_numbers = RegexSanitizer::category(
        "[phonenumber]",
        &[
            r"\+44\s?\d{4}\s?\d{6}\b",
            r"\b0\d{3}\s\d{7}\b",
            r"\b0\d{4}\s\d{6}\b",
            r"\b0\d{2}\s\d{4}\s\d{4}\b",
            r"\b0\d{10}\b",
        ],
    );
    pipeline.add(ExclusiveSanitizer::new(vec![dates, postcodes, phone_numbers]));

    pipeline
}
