//! Prediction pipeline: normalize a review, encode it, run the ensemble and
//! the two base models, and band the ensemble's confidence.

pub mod analysis;
pub mod predictor;

pub use analysis::{Analysis, AnalyzeOptions, Confidence, ConfidenceBand, ModelComparison};
pub use predictor::Predictor;
