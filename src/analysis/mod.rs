//! Text analysis: char filters, tokenizers, token filters and the analyzers
//! built from them, plus the review normalizer that chains them with the
//! loaded stop word remover and stemmer.

pub mod analyzer;
pub mod char_filter;
pub mod normalizer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
pub mod tools;

pub use analyzer::*;
pub use normalizer::{NormalizationTrace, TextNormalizer};
pub use token::*;
pub use token_filter::*;
pub use tokenizer::*;
pub use tools::{PreprocessingTools, StopwordRemover, TextStemmer};
