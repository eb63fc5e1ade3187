//! Review in, analysis out.

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use crate::analysis::normalizer::{NormalizationTrace, TextNormalizer};
use crate::artifacts::ArtifactBundle;
use crate::error::{Result, SentimenError};
use crate::ml::{Classifier, FeatureVector};
use crate::pipeline::analysis::{Analysis, AnalyzeOptions, Confidence, ModelComparison};

/// Runs the normalize, encode and classify steps over a loaded bundle.
///
/// Cheap to clone; clones share the bundle.
#[derive(Debug, Clone)]
pub struct Predictor {
    bundle: Arc<ArtifactBundle>,
    normalizer: TextNormalizer,
}

impl Predictor {
    pub fn new(bundle: Arc<ArtifactBundle>) -> Result<Self> {
        Ok(Predictor {
            bundle,
            normalizer: TextNormalizer::new()?,
        })
    }

    pub fn bundle(&self) -> &ArtifactBundle {
        &self.bundle
    }

    /// Normalize a review with the loaded tools.
    pub fn normalize(&self, review: &str) -> Result<NormalizationTrace> {
        self.normalizer.trace(review, self.bundle.tools())
    }

    /// Encode already normalized text.
    pub fn encode(&self, normalized: &str) -> Result<FeatureVector> {
        self.bundle.vectorizer().transform(normalized)
    }

    /// Analyze one review.
    ///
    /// Blank input fails with [`SentimenError::EmptyInput`] before any model
    /// is touched.
    pub fn analyze(&self, review: &str, options: &AnalyzeOptions) -> Result<Analysis> {
        if review.trim().is_empty() {
            return Err(SentimenError::EmptyInput);
        }

        let trace = self.normalize(review)?;
        let features = self.encode(trace.normalized())?;
        debug!(
            "{:?} -> {} active features",
            trace.normalized(),
            features.nnz()
        );

        let ensemble = self.bundle.ensemble();
        let label = ensemble.predict(&features)?;
        let probabilities = ensemble.predict_proba(&features)?;

        let comparison = if options.compare_models {
            Some(ModelComparison {
                bernoulli_nb: self.bundle.bernoulli_nb().predict(&features)?,
                linear_svm: self.bundle.linear_svm().predict(&features)?,
            })
        } else {
            None
        };

        Ok(Analysis {
            review: review.to_string(),
            label,
            confidence: Confidence::from_probabilities(&probabilities),
            probabilities,
            comparison,
            details: options.show_details.then_some(trace),
        })
    }

    /// Analyze many reviews in parallel. Results keep the input order and a
    /// failure only affects its own review.
    pub fn analyze_batch<S>(&self, reviews: &[S], options: &AnalyzeOptions) -> Vec<Result<Analysis>>
    where
        S: AsRef<str> + Sync,
    {
        reviews
            .par_iter()
            .map(|review| self.analyze(review.as_ref(), options))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ToolsArtifact;
    use crate::ml::{
        BernoulliNb, Estimator, LinearSvm, NamedEstimator, PlattCalibration, Sentiment,
        TfIdfVectorizer, Voting, VotingClassifier,
    };
    use crate::pipeline::analysis::ConfidenceBand;

    fn predictor() -> Predictor {
        predictor_with(Voting::Soft)
    }

    fn predictor_with(voting: Voting) -> Predictor {
        let vocabulary = ["bagus", "jelek", "film"]
            .iter()
            .enumerate()
            .map(|(i, t)| (t.to_string(), i))
            .collect();
        let vectorizer = TfIdfVectorizer::new(vocabulary, vec![1.5, 1.5, 1.0]).unwrap();

        let nb = BernoulliNb::new(
            Sentiment::ALL,
            [0.5f64.ln(), 0.5f64.ln()],
            [
                vec![0.1f64.ln(), 0.9f64.ln(), 0.5f64.ln()],
                vec![0.9f64.ln(), 0.1f64.ln(), 0.5f64.ln()],
            ],
        )
        .unwrap();
        let svm = LinearSvm::new(Sentiment::ALL, vec![3.0, -3.0, 0.0], 0.0)
            .unwrap()
            .with_calibration(PlattCalibration { a: -2.0, b: 0.0 });
        let ensemble = VotingClassifier::new(
            Sentiment::ALL,
            vec![
                NamedEstimator::new("bnb", Estimator::BernoulliNb(nb.clone())),
                NamedEstimator::new("svm", Estimator::LinearSvm(svm.clone())),
            ],
            voting,
            None,
        )
        .unwrap();

        let bundle =
            ArtifactBundle::new(nb, svm, ensemble, vectorizer, ToolsArtifact::default()).unwrap();
        Predictor::new(Arc::new(bundle)).unwrap()
    }

    #[test]
    fn test_analyze_positive_and_negative() {
        let predictor = predictor();
        let options = AnalyzeOptions::default();

        let positive = predictor.analyze("Filmnya BAGUS!!", &options).unwrap();
        assert_eq!(positive.label, Sentiment::Positive);
        assert!(positive.probabilities.positive > 0.8);
        assert_eq!(positive.confidence.band, ConfidenceBand::High);
        assert_eq!(
            positive.comparison,
            Some(ModelComparison {
                bernoulli_nb: Sentiment::Positive,
                linear_svm: Sentiment::Positive,
            })
        );
        assert!(positive.details.is_none());

        let negative = predictor.analyze("film yang jelek", &options).unwrap();
        assert_eq!(negative.label, Sentiment::Negative);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let predictor = predictor();
        for review in ["bagus", "jelek", "film", "tidak ada kata yang dikenal"] {
            let analysis = predictor.analyze(review, &AnalyzeOptions::default()).unwrap();
            let sum = analysis.probabilities.negative + analysis.probabilities.positive;
            assert!((sum - 1.0).abs() < 1e-9);
            assert!((analysis.confidence.percent - analysis.probabilities.max() * 100.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_input_guard() {
        let predictor = predictor();
        for review in ["", "   ", "\t\n"] {
            assert!(matches!(
                predictor.analyze(review, &AnalyzeOptions::default()),
                Err(SentimenError::EmptyInput)
            ));
        }
    }

    #[test]
    fn test_blank_input_never_reaches_the_models() {
        // A hard-voting ensemble has no probabilities, so every review that
        // gets as far as the ensemble fails with a model error.
        let predictor = predictor_with(Voting::Hard);
        let options = AnalyzeOptions::default();

        assert!(matches!(
            predictor.analyze("film bagus", &options),
            Err(SentimenError::Model(_))
        ));
        assert!(matches!(
            predictor.analyze("123 !!!", &options),
            Err(SentimenError::Model(_))
        ));
        for review in ["", "  \t", "\n\n"] {
            assert!(matches!(
                predictor.analyze(review, &options),
                Err(SentimenError::EmptyInput)
            ));
        }
    }

    #[test]
    fn test_options() {
        let predictor = predictor();
        let options = AnalyzeOptions {
            compare_models: false,
            show_details: true,
        };
        let analysis = predictor.analyze("Film yang bagus", &options).unwrap();

        assert!(analysis.comparison.is_none());
        let details = analysis.details.unwrap();
        assert_eq!(details.cleaned, "film yang bagus");
        assert_eq!(details.without_stopwords, "film bagus");
        assert_eq!(details.stemmed, "film bagus");
    }

    #[test]
    fn test_batch_preserves_order() {
        let predictor = predictor();
        let reviews = vec!["bagus", "", "jelek", "bagus sekali"];
        let results = predictor.analyze_batch(&reviews, &AnalyzeOptions::default());

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].as_ref().unwrap().label, Sentiment::Positive);
        assert!(matches!(results[1], Err(SentimenError::EmptyInput)));
        assert_eq!(results[2].as_ref().unwrap().label, Sentiment::Negative);
        assert_eq!(results[3].as_ref().unwrap().review, "bagus sekali");
    }

    #[test]
    fn test_deterministic() {
        let predictor = predictor();
        let options = AnalyzeOptions {
            compare_models: true,
            show_details: true,
        };
        assert_eq!(
            predictor.analyze("Film bagus, tidak jelek", &options).unwrap(),
            predictor.analyze("Film bagus, tidak jelek", &options).unwrap()
        );
    }
}
