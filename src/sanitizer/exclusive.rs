//! First-match-wins redaction over several categories.

use super::{RegexSanitizer, Sanitizer};

/// Tests categories in order and applies only the first one that detects
/// something, so a value is never rewritten by two categories.
///
/// # Example
///
/// ```
/// use form_analytics::{ExclusiveSanitizer, RegexSanitizer, Sanitizer};
///
/// let s = ExclusiveSanitizer::new(vec![
///     RegexSanitizer::category("[year]", &[r"\d{4}"]),
///     RegexSanitizer::category("[number]", &[r"\d+"]),
/// ]);
/// assert_eq!(s.sanitize("born 1990, aged 34"), "born [year], aged 34");
/// ```
#[derive(Default)]
pub struct ExclusiveSanitizer {
    categories: Vec<Box<dyn Sanitizer>>,
}

impl ExclusiveSanitizer {
    pub fn new(categories: Vec<RegexSanitizer>) -> Self {
        Self {
            categories: categories
                .into_iter()
                .map(|c| Box::new(c) as Box<dyn Sanitizer>)
                .collect(),
        }
    }

    /// Append a lower-priority category.
    pub fn with(mut self, category: impl Sanitizer + 'static) -> Self {
        self.categories.push(Box::new(category));
        self
    }
}

impl Sanitizer for ExclusiveSanitizer {
    fn sanitize(&self, text: &str) -> String {
        match self.categories.iter().find(|c| c.detects(text)) {
            Some(category) => category.sanitize(text),
            None => text.to_string(),
        }
    }

    fn detects(&self, text: &str) -> bool {
        self.categories.iter().any(|c| c.detects(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> ExclusiveSanitizer {
        ExclusiveSanitizer::new(vec![
            RegexSanitizer::category("[date]", &[r"\d{2}/\d{2}"]),
            RegexSanitizer::category("[zip]", &[r"\d{5}"]),
        ])
    }

    #[test]
    fn first_matching_category_wins() {
        assert_eq!(categories().sanitize("12/05 and 90210"), "[date] and 90210");
    }

    #[test]
    fn later_category_applies_when_earlier_ones_miss() {
        assert_eq!(categories().sanitize("zip 90210"), "zip [zip]");
    }

    #[test]
    fn unmatched_text_is_unchanged() {
        assert_eq!(categories().sanitize("plain"), "plain");
        assert!(!categories().detects("plain"));
    }
}
