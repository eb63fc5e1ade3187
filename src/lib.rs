//! # Sentimen
//!
//! Sentiment analysis of Indonesian movie reviews with a soft-voting
//! ensemble of Bernoulli naive Bayes and a linear SVM.
//!
//! A review goes through four stages:
//!
//! - text normalization (cleaning, stop word removal, stemming)
//! - TF-IDF feature encoding against a fitted vocabulary
//! - ensemble prediction plus the two base models' labels
//! - confidence banding of the winning probability
//!
//! The fitted models, the vectorizer and the preprocessing tools are loaded
//! from five artifacts, see [`artifacts`].
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use sentimen::artifacts::{load_bundle, ArtifactConfig};
//! use sentimen::pipeline::{AnalyzeOptions, Predictor};
//!
//! let bundle = load_bundle(&ArtifactConfig::new("models")).unwrap();
//! let predictor = Predictor::new(Arc::new(bundle)).unwrap();
//! let analysis = predictor
//!     .analyze("Filmnya bagus banget!", &AnalyzeOptions::default())
//!     .unwrap();
//! println!("{} ({:.1}%)", analysis.label, analysis.confidence.percent);
//! ```

pub mod analysis;
pub mod app;
pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod pipeline;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
