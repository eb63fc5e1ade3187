//! Opaque preprocessing tools used by the text normalizer.
//!
//! The normalizer only needs two capabilities: removing stop words from a
//! cleaned string and stemming a cleaned string. Both are expressed as traits
//! so the concrete linguistic algorithm can be swapped without touching the
//! pipeline.

use std::sync::Arc;

use crate::analysis::token::join_tokens;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::error::Result;

/// Removes stop words from whitespace-separated text.
pub trait StopwordRemover: Send + Sync {
    /// Return `text` without its stop words, words joined by single spaces.
    fn remove(&self, text: &str) -> Result<String>;
}

/// Reduces every word of whitespace-separated text to its root form.
pub trait TextStemmer: Send + Sync {
    /// Return `text` with every word stemmed, words joined by single spaces.
    fn stem_text(&self, text: &str) -> Result<String>;
}

/// The stopword remover and stemmer loaded from the `preprocessing_tools` artifact.
#[derive(Clone)]
pub struct PreprocessingTools {
    stopword: Arc<dyn StopwordRemover>,
    stemmer: Arc<dyn TextStemmer>,
    description: String,
}

impl PreprocessingTools {
    /// Bundle a stopword remover and a stemmer.
    pub fn new(
        stopword: Arc<dyn StopwordRemover>,
        stemmer: Arc<dyn TextStemmer>,
        description: impl Into<String>,
    ) -> Self {
        PreprocessingTools {
            stopword,
            stemmer,
            description: description.into(),
        }
    }

    /// The stopword-removal capability.
    pub fn stopword(&self) -> &dyn StopwordRemover {
        self.stopword.as_ref()
    }

    /// The stemming capability.
    pub fn stemmer(&self) -> &dyn TextStemmer {
        self.stemmer.as_ref()
    }

    /// Human-readable summary of the tools, e.g. for `inspect`.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl std::fmt::Debug for PreprocessingTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreprocessingTools")
            .field("description", &self.description)
            .finish()
    }
}

/// Run one token filter over whitespace-separated text.
pub(crate) fn filter_text(filter: &dyn Filter, text: &str) -> Result<String> {
    let tokens = WhitespaceTokenizer::new().tokenize(text)?;
    Ok(join_tokens(filter.filter(tokens)?))
}
