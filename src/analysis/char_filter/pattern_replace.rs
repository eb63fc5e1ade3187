use regex::Regex;

use super::CharFilter;
use crate::error::{Result, SentimenError};

/// Pattern matching every maximal run of characters outside the Latin alphabet.
pub const NON_LATIN_RUN_PATTERN: &str = r"[^A-Za-z]+";

/// A char filter that replaces every regex match with a fixed string.
#[derive(Clone, Debug)]
pub struct PatternReplaceCharFilter {
    pattern: Regex,
    replacement: String,
}

impl PatternReplaceCharFilter {
    /// Create a new pattern replace char filter.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .map_err(|e| SentimenError::analysis(format!("Invalid regex pattern: {e}")))?,
            replacement: replacement.to_string(),
        })
    }

    /// Filter that turns each run of non `[A-Za-z]` characters into one space.
    pub fn latin_letters_only() -> Result<Self> {
        Self::new(NON_LATIN_RUN_PATTERN, " ")
    }

    /// Get the regex pattern used by this filter.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl CharFilter for PatternReplaceCharFilter {
    fn filter(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }

    fn name(&self) -> &'static str {
        "pattern_replace"
    }
}
