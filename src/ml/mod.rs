//! Feature encoding and sentiment classifiers.
//!
//! Every model here is a fitted artifact: parameters are learned offline and
//! deserialized at startup. Nothing in this module trains or refits.
//!
//! # Architecture
//!
//! - `TfIdfVectorizer`: review text to sparse `FeatureVector`
//! - `Classifier` trait: common interface for all models
//! - `BernoulliNb`, `LinearSvm`: the two base models
//! - `VotingClassifier`: soft or hard voting over the base models
//!
//! # Example
//!
//! ```
//! use sentimen::ml::{
//!     BernoulliNb, Classifier, Estimator, LinearSvm, NamedEstimator, PlattCalibration,
//!     Sentiment, TfIdfVectorizer, Voting, VotingClassifier,
//! };
//!
//! # fn main() -> sentimen::error::Result<()> {
//! let vocabulary = [("bagus".to_string(), 0), ("jelek".to_string(), 1)]
//!     .into_iter()
//!     .collect();
//! let vectorizer = TfIdfVectorizer::new(vocabulary, vec![1.0, 1.0])?;
//!
//! let nb = BernoulliNb::new(
//!     Sentiment::ALL,
//!     [0.5f64.ln(), 0.5f64.ln()],
//!     [vec![0.1f64.ln(), 0.9f64.ln()], vec![0.9f64.ln(), 0.1f64.ln()]],
//! )?;
//! let svm = LinearSvm::new(Sentiment::ALL, vec![2.0, -2.0], 0.0)?
//!     .with_calibration(PlattCalibration { a: -1.5, b: 0.0 });
//! let ensemble = VotingClassifier::new(
//!     Sentiment::ALL,
//!     vec![
//!         NamedEstimator::new("nb", Estimator::BernoulliNb(nb)),
//!         NamedEstimator::new("svm", Estimator::LinearSvm(svm)),
//!     ],
//!     Voting::Soft,
//!     None,
//! )?;
//!
//! let features = vectorizer.transform("bagus")?;
//! assert_eq!(ensemble.predict(&features)?, Sentiment::Positive);
//! # Ok(())
//! # }
//! ```

pub mod bernoulli_nb;
pub mod classifier;
pub mod features;
pub mod label;
pub mod linear_svm;
pub mod tfidf;
pub mod voting;

pub use bernoulli_nb::BernoulliNb;
pub use classifier::Classifier;
pub use features::FeatureVector;
pub use label::{Probabilities, Sentiment};
pub use linear_svm::{LinearSvm, PlattCalibration};
pub use tfidf::{Norm, TfIdfVectorizer};
pub use voting::{Estimator, NamedEstimator, Voting, VotingClassifier};
