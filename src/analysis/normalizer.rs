//! Review text normalizer.
//!
//! Turns a raw review into the cleaned string the vectorizer was fitted on.
//! The pipeline is order sensitive:
//!
//! 1. every maximal run of characters outside `[A-Za-z]` becomes one space
//! 2. lowercase
//! 3. trim
//! 4. collapse whitespace runs into one space
//! 5. remove stop words
//! 6. stem
//!
//! Steps 1–4 run through a [`PipelineAnalyzer`]; steps 5 and 6 are delegated
//! to the loaded [`PreprocessingTools`].
//!
//! # Examples
//!
//! ```
//! use sentimen::analysis::normalizer::TextNormalizer;
//!
//! let normalizer = TextNormalizer::new().unwrap();
//! assert_eq!(normalizer.clean("Film nya BAGUS!! 123").unwrap(), "film nya bagus");
//! ```

use std::sync::Arc;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::char_filter::pattern_replace::PatternReplaceCharFilter;
use crate::analysis::token::join_tokens;
use crate::analysis::token_filter::LowercaseFilter;
use crate::analysis::tokenizer::WhitespaceTokenizer;
use crate::analysis::tools::PreprocessingTools;
use crate::error::Result;

/// Intermediate strings of one normalization run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationTrace {
    /// The review as submitted.
    pub original: String,
    /// After character filtering, lowercasing, trimming and collapsing.
    pub cleaned: String,
    /// After stop word removal.
    pub without_stopwords: String,
    /// After stemming; this is what the vectorizer sees.
    pub stemmed: String,
}

impl NormalizationTrace {
    /// The final normalized text.
    pub fn normalized(&self) -> &str {
        &self.stemmed
    }
}

/// Applies the fixed review-cleaning pipeline.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    cleaner: PipelineAnalyzer,
}

impl TextNormalizer {
    /// Build the normalizer.
    pub fn new() -> Result<Self> {
        let cleaner = PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
            .add_char_filter(Arc::new(PatternReplaceCharFilter::latin_letters_only()?))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("review_cleaner");

        Ok(TextNormalizer { cleaner })
    }

    /// Steps 1–4: only lowercase Latin letters separated by single spaces remain.
    pub fn clean(&self, text: &str) -> Result<String> {
        Ok(join_tokens(self.cleaner.analyze(text)?))
    }

    /// All six steps, keeping every intermediate string.
    pub fn trace(&self, text: &str, tools: &PreprocessingTools) -> Result<NormalizationTrace> {
        let cleaned = self.clean(text)?;
        let without_stopwords = tools.stopword().remove(&cleaned)?;
        let stemmed = tools.stemmer().stem_text(&without_stopwords)?;

        trace!("normalized {text:?} -> {stemmed:?}");

        Ok(NormalizationTrace {
            original: text.to_string(),
            cleaned,
            without_stopwords,
            stemmed,
        })
    }

    /// All six steps, returning only the final text.
    pub fn normalize(&self, text: &str, tools: &PreprocessingTools) -> Result<String> {
        Ok(self.trace(text, tools)?.stemmed)
    }
}
