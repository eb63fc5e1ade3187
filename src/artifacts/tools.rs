//! The `preprocessing_tools` artifact: which stopword remover and stemmer
//! the normalizer uses, with their word lists.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::token_filter::{IdentityStemmer, IndonesianStemmer, StemFilter, StopFilter};
use crate::analysis::tools::PreprocessingTools;
use crate::error::{Result, SentimenError};

/// Stop word source.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopwordSpec {
    /// The built-in Indonesian list.
    #[default]
    Default,
    /// A custom list.
    Words(Vec<String>),
}

/// Stemming algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StemmerSpec {
    /// Leave words unchanged.
    #[default]
    Identity,
    /// Dictionary-backed Indonesian affix stripping.
    Indonesian { root_words: Vec<String> },
}

/// Serialized form of the preprocessing tools.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolsArtifact {
    #[serde(default)]
    pub stopwords: StopwordSpec,
    #[serde(default)]
    pub stemmer: StemmerSpec,
}

impl ToolsArtifact {
    /// Instantiate the tools described by this artifact.
    pub fn build(&self) -> Result<PreprocessingTools> {
        let stopword = match &self.stopwords {
            StopwordSpec::Default => StopFilter::new(),
            StopwordSpec::Words(words) => {
                if words.iter().any(|w| w.trim().is_empty()) {
                    return Err(SentimenError::config("stop word list contains a blank entry"));
                }
                StopFilter::from_words(words.iter().map(|w| w.to_lowercase()))
            }
        };

        let stemmer = match &self.stemmer {
            StemmerSpec::Identity => StemFilter::with_stemmer(Arc::new(IdentityStemmer::new())),
            StemmerSpec::Indonesian { root_words } => {
                if root_words.is_empty() {
                    return Err(SentimenError::config("indonesian stemmer needs root words"));
                }
                StemFilter::with_stemmer(Arc::new(IndonesianStemmer::from_words(
                    root_words.iter().map(|w| w.to_lowercase()),
                )))
            }
        };

        let description = format!("{} + {}", self.stopword_summary(), self.stemmer_summary());
        Ok(PreprocessingTools::new(
            Arc::new(stopword),
            Arc::new(stemmer),
            description,
        ))
    }

    fn stopword_summary(&self) -> String {
        match &self.stopwords {
            StopwordSpec::Default => "default indonesian stop words".to_string(),
            StopwordSpec::Words(words) => format!("{} custom stop words", words.len()),
        }
    }

    fn stemmer_summary(&self) -> String {
        match &self.stemmer {
            StemmerSpec::Identity => "identity stemmer".to_string(),
            StemmerSpec::Indonesian { root_words } => {
                format!("indonesian stemmer ({} root words)", root_words.len())
            }
        }
    }
}
