//! Composable redaction passes.
//!
//! A [`Sanitizer`] rewrites the personal data it recognises in a value and
//! can report whether it would recognise anything at all. Passes are chained
//! with a [`SanitizerPipeline`] (every pass runs) or an
//! [`ExclusiveSanitizer`] (only the first pass that detects something runs).
//!
//! - [`RegexSanitizer`] -- pattern rules replaced with a redaction tag.
//! - [`ExclusiveSanitizer`] -- first-match-wins over several categories.

mod exclusive;
mod regex;

pub use self::regex::RegexSanitizer;
pub use exclusive::ExclusiveSanitizer;

/// A redaction pass over lower-cased text.
///
/// Implementations must be `Send + Sync` so the default validator can live
/// in a static.
pub trait Sanitizer: Send + Sync {
    /// Rewrite whatever this pass recognises.
    fn sanitize(&self, text: &str) -> String;

    /// Whether [`sanitize`](Self::sanitize) would change `text`.
    fn detects(&self, text: &str) -> bool {
        self.sanitize(text) != text
    }
}

/// Passes run back to back, each one seeing the previous one's output.
///
/// A pipeline is itself a [`Sanitizer`], so it can stand as one category of
/// an [`ExclusiveSanitizer`].
#[derive(Default)]
pub struct SanitizerPipeline {
    passes: Vec<Box<dyn Sanitizer>>,
}

impl SanitizerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pass: impl Sanitizer + 'static) {
        self.add_boxed(Box::new(pass));
    }

    pub fn add_boxed(&mut self, pass: Box<dyn Sanitizer>) {
        self.passes.push(pass);
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }
}

impl Sanitizer for SanitizerPipeline {
    fn sanitize(&self, text: &str) -> String {
        let mut out = text.to_string();
        for pass in &self.passes {
            if pass.detects(&out) {
                out = pass.sanitize(&out);
            }
        }
        out
    }

    fn detects(&self, text: &str) -> bool {
        self.passes.iter().any(|pass| pass.detects(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pipeline_leaves_text_alone() {
        let pipeline = SanitizerPipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.sanitize("unchanged"), "unchanged");
        assert!(!pipeline.detects("unchanged"));
    }

    #[test]
    fn passes_see_previous_output() {
        let mut pipeline = SanitizerPipeline::new();
        pipeline.add(RegexSanitizer::new(vec![(r"secret-\d+", "[token]")]));
        pipeline.add(RegexSanitizer::new(vec![(r"\[token\]", "[redacted]")]));
        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.sanitize("key secret-42 here"), "key [redacted] here");
    }

    #[test]
    fn boxed_passes_and_custom_sanitizers() {
        struct Upper;
        impl Sanitizer for Upper {
            fn sanitize(&self, text: &str) -> String {
                text.to_uppercase()
            }
        }

        let mut pipeline = SanitizerPipeline::new();
        pipeline.add_boxed(Box::new(RegexSanitizer::new(vec![("a", "b")])));
        pipeline.add(Upper);
        assert_eq!(pipeline.sanitize("aa"), "BB");
        assert!(!Upper.detects("ALREADY"));
    }

    #[test]
    fn pipeline_nests_inside_exclusive() {
        let mut ids = SanitizerPipeline::new();
        ids.add(RegexSanitizer::category("[id]", &[r"\bid\d+\b"]));
        let exclusive = ExclusiveSanitizer::new(vec![])
            .with(ids)
            .with(RegexSanitizer::category("[n]", &[r"\d+"]));
        assert_eq!(exclusive.sanitize("id42 and 7"), "[id] and 7");
    }
}
