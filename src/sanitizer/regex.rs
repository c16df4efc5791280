//! Pattern-based redaction.

use std::borrow::Cow;

use regex::Regex;

use super::Sanitizer;

struct Rule {
    pattern: Regex,
    replacement: String,
}

/// Redacts every match of its patterns, rule by rule.
///
/// Build one from `(pattern, replacement)` pairs, or with
/// [`category`](Self::category) when several patterns share one tag.
///
/// # Example
///
/// ```
/// use form_analytics::{RegexSanitizer, Sanitizer};
///
/// let nino = RegexSanitizer::category("[nino]", &[r"\b[a-z]{2}\d{6}[a-d]\b"]);
/// assert_eq!(nino.sanitize("ref qq123456c"), "ref [nino]");
/// ```
pub struct RegexSanitizer {
    rules: Vec<Rule>,
}

impl RegexSanitizer {
    /// # Panics
    ///
    /// Panics on an invalid pattern. Use [`try_new`](Self::try_new) for
    /// patterns that are not known at compile time.
    pub fn new(rules: Vec<(&str, &str)>) -> Self {
        match Self::try_new(rules) {
            Ok(sanitizer) => sanitizer,
            Err(e) => panic!("invalid redaction pattern: {e}"),
        }
    }

    pub fn try_new(rules: Vec<(&str, &str)>) -> Result<Self, regex::Error> {
        let rules = rules
            .into_iter()
            .map(|(pattern, replacement)| {
                Ok(Rule {
                    pattern: Regex::new(pattern)?,
                    replacement: replacement.to_string(),
                })
            })
            .collect::<Result<_, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// One redaction category: every pattern is replaced with `tag`.
    ///
    /// # Panics
    ///
    /// Panics on an invalid pattern.
    pub fn category(tag: &str, patterns: &[&str]) -> Self {
        Self::new(patterns.iter().map(|p| (*p, tag)).collect())
    }

    /// `true` if any rule matches somewhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.rules.iter().any(|rule| rule.pattern.is_match(text))
    }
}

impl Sanitizer for RegexSanitizer {
    fn sanitize(&self, text: &str) -> String {
        let mut out = Cow::Borrowed(text);
        for rule in &self.rules {
            let replaced = match rule.pattern.replace_all(&out, rule.replacement.as_str()) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                out = Cow::Owned(replaced);
            }
        }
        out.into_owned()
    }

    fn detects(&self, text: &str) -> bool {
        self.is_match(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_occurrence_is_replaced() {
        let sanitizer = RegexSanitizer::new(vec![(r"\d{3}-\d{4}", "[number]")]);
        assert_eq!(
            sanitizer.sanitize("call 555-1234 or 555-9876"),
            "call [number] or [number]"
        );
    }

    #[test]
    fn rules_see_previous_output() {
        let sanitizer = RegexSanitizer::new(vec![
            (r"\d{3}-\d{2}-\d{4}", "[ssn]"),
            (r"\[ssn\]", "***-**-****"),
        ]);
        assert_eq!(sanitizer.sanitize("ssn: 123-45-6789"), "ssn: ***-**-****");
    }

    #[test]
    fn category_shares_one_tag() {
        let phones = RegexSanitizer::category("[phone]", &[r"\b0\d{10}\b", r"\+44\d{10}\b"]);
        assert_eq!(
            phones.sanitize("07011234567 or +447011234567"),
            "[phone] or [phone]"
        );
        assert!(phones.detects("call 07011234567"));
        assert!(!phones.detects("call me"));
    }

    #[test]
    fn no_rules_match_nothing() {
        assert!(!RegexSanitizer::new(vec![]).is_match("anything"));
        assert_eq!(RegexSanitizer::new(vec![]).sanitize("anything"), "anything");
    }

    #[test]
    fn try_new_reports_invalid_patterns() {
        assert!(RegexSanitizer::try_new(vec![("[invalid", "x")]).is_err());
        let sanitizer = RegexSanitizer::try_new(vec![(r"\d+", "NUM")]).unwrap();
        assert_eq!(sanitizer.sanitize("abc 123 def"), "abc NUM def");
    }
}
