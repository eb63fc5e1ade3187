//! Fitted TF-IDF vectorizer for text feature extraction.
//!
//! The vectorizer is an artifact: its vocabulary and IDF weights are learned
//! offline and only applied here. Tokens outside the vocabulary are dropped.

use std::sync::{Arc, OnceLock};

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, PipelineAnalyzer};
use crate::analysis::token_filter::LowercaseFilter;
use crate::analysis::tokenizer::RegexTokenizer;
use crate::analysis::tokenizer::regex::DEFAULT_TOKEN_PATTERN;
use crate::error::{Result, SentimenError};
use crate::ml::features::FeatureVector;

/// Row normalization applied after weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_true() -> bool {
    true
}

/// TF-IDF vectorizer for text feature extraction.
#[derive(Clone, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Vocabulary: term -> feature index.
    vocabulary: AHashMap<String, usize>,
    /// Inverse document frequency for each feature index.
    #[serde(default)]
    idf: Vec<f64>,
    #[serde(default = "default_token_pattern")]
    token_pattern: String,
    #[serde(default = "default_true")]
    lowercase: bool,
    /// Inclusive word n-gram range.
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    sublinear_tf: bool,
    #[serde(default)]
    binary: bool,
    #[serde(default = "default_true")]
    use_idf: bool,
    #[serde(default)]
    norm: Norm,
    /// Tokenizer compiled from `token_pattern` on first use.
    #[serde(skip)]
    analyzer: OnceLock<PipelineAnalyzer>,
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("vocabulary_size", &self.vocabulary.len())
            .field("token_pattern", &self.token_pattern)
            .field("ngram_range", &self.ngram_range)
            .field("sublinear_tf", &self.sublinear_tf)
            .field("binary", &self.binary)
            .field("use_idf", &self.use_idf)
            .field("norm", &self.norm)
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a vectorizer from a fitted vocabulary and IDF weights, with
    /// unigrams, lowercasing, IDF weighting and L2 normalization.
    pub fn new(vocabulary: AHashMap<String, usize>, idf: Vec<f64>) -> Result<Self> {
        let vectorizer = TfIdfVectorizer {
            vocabulary,
            idf,
            token_pattern: default_token_pattern(),
            lowercase: true,
            ngram_range: default_ngram_range(),
            sublinear_tf: false,
            binary: false,
            use_idf: true,
            norm: Norm::L2,
            analyzer: OnceLock::new(),
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Result<Self> {
        self.ngram_range = (min_n, max_n);
        self.validate()?;
        Ok(self)
    }

    pub fn with_sublinear_tf(mut self, sublinear_tf: bool) -> Self {
        self.sublinear_tf = sublinear_tf;
        self
    }

    pub fn with_binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_use_idf(mut self, use_idf: bool) -> Result<Self> {
        self.use_idf = use_idf;
        self.validate()?;
        Ok(self)
    }

    pub fn with_token_pattern(mut self, pattern: &str) -> Result<Self> {
        self.token_pattern = pattern.to_string();
        self.analyzer = OnceLock::new();
        self.validate()?;
        Ok(self)
    }

    /// Check internal consistency and compile the token pattern.
    pub fn validate(&self) -> Result<()> {
        let dim = self.vocabulary.len();

        let mut seen = AHashSet::with_capacity(dim);
        for (term, &index) in &self.vocabulary {
            if index >= dim {
                return Err(SentimenError::encoding(format!(
                    "term {term:?} has index {index}, vocabulary size is {dim}"
                )));
            }
            if !seen.insert(index) {
                return Err(SentimenError::encoding(format!(
                    "index {index} is assigned to more than one term"
                )));
            }
        }

        if self.use_idf && self.idf.len() != dim {
            return Err(SentimenError::encoding(format!(
                "idf has {} weights, vocabulary size is {dim}",
                self.idf.len()
            )));
        }
        if let Some(weight) = self.idf.iter().find(|w| !w.is_finite()) {
            return Err(SentimenError::encoding(format!("non-finite idf weight {weight}")));
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SentimenError::encoding(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        self.analyzer()?;
        Ok(())
    }

    /// Number of features, i.e. the vocabulary size.
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &AHashMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    pub fn norm(&self) -> Norm {
        self.norm
    }

    /// Index of `term`, if it is in the vocabulary.
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Transform one document into a TF-IDF feature vector.
    pub fn transform(&self, document: &str) -> Result<FeatureVector> {
        let terms = self.terms(document)?;

        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        for term in &terms {
            if let Some(&index) = self.vocabulary.get(term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts
            .into_iter()
            .map(|(index, count)| {
                let tf = if self.binary {
                    1.0
                } else if self.sublinear_tf {
                    1.0 + count.ln()
                } else {
                    count
                };
                let weight = if self.use_idf { self.idf[index] } else { 1.0 };
                (index, tf * weight)
            })
            .collect();

        let mut vector = FeatureVector::from_entries(self.dim(), entries)?;
        match self.norm {
            Norm::L2 => {
                let norm = vector.l2_norm();
                vector.scale(norm);
            }
            Norm::L1 => {
                let norm = vector.l1_norm();
                vector.scale(norm);
            }
            Norm::None => {}
        }

        Ok(vector)
    }

    /// Tokenize and expand into word n-grams.
    fn terms(&self, document: &str) -> Result<Vec<String>> {
        let tokens: Vec<String> = self
            .analyzer()?
            .analyze(document)?
            .map(|token| token.text)
            .collect();

        let (min_n, max_n) = self.ngram_range;
        if min_n == 1 && max_n == 1 {
            return Ok(tokens);
        }

        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                terms.push(window.join(" "));
            }
        }
        Ok(terms)
    }

    fn analyzer(&self) -> Result<&PipelineAnalyzer> {
        if let Some(analyzer) = self.analyzer.get() {
            return Ok(analyzer);
        }

        let tokenizer = RegexTokenizer::with_pattern(&self.token_pattern)
            .map_err(|e| SentimenError::encoding(format!("token_pattern: {e}")))?;
        let mut analyzer = PipelineAnalyzer::new(Arc::new(tokenizer)).with_name("tfidf");
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }

        Ok(self.analyzer.get_or_init(|| analyzer))
    }
}
