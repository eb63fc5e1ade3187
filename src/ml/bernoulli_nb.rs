//! Bernoulli naive Bayes over binarized features.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimenError};
use crate::ml::classifier::Classifier;
use crate::ml::features::FeatureVector;
use crate::ml::label::{Probabilities, Sentiment, argmax, validate_classes};

fn default_binarize() -> Option<f64> {
    Some(0.0)
}

/// A fitted Bernoulli naive Bayes model.
///
/// Each feature is reduced to present/absent (value above `binarize`) and the
/// joint log-likelihood of class `c` is
/// `log P(c) + Σ_j x_j·log p_cj + (1 − x_j)·log(1 − p_cj)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BernoulliNb {
    classes: [Sentiment; 2],
    /// Log prior of each class, in class order.
    class_log_prior: [f64; 2],
    /// Log probability of each feature being present, one row per class.
    feature_log_prob: [Vec<f64>; 2],
    /// Threshold for binarizing inputs; `None` treats inputs as already binary.
    #[serde(default = "default_binarize")]
    binarize: Option<f64>,
}

impl BernoulliNb {
    pub fn new(
        classes: [Sentiment; 2],
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    ) -> Result<Self> {
        let model = BernoulliNb {
            classes,
            class_log_prior,
            feature_log_prob,
            binarize: default_binarize(),
        };
        model.validate()?;
        Ok(model)
    }

    pub fn with_binarize(mut self, binarize: Option<f64>) -> Self {
        self.binarize = binarize;
        self
    }

    /// Check parameter shapes and ranges.
    pub fn validate(&self) -> Result<()> {
        validate_classes(&self.classes)?;

        let [first, second] = &self.feature_log_prob;
        if first.len() != second.len() {
            return Err(SentimenError::model(format!(
                "feature_log_prob rows differ in length ({} vs {})",
                first.len(),
                second.len()
            )));
        }

        for log_prob in self.class_log_prior.iter().chain(first).chain(second) {
            if !log_prob.is_finite() || *log_prob >= 0.0 {
                return Err(SentimenError::model(format!(
                    "log probability {log_prob} outside (-inf, 0)"
                )));
            }
        }

        Ok(())
    }

    /// Joint log-likelihood of each class, in class order.
    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        features.check_dim(self.n_features())?;

        let mut jll = self.class_log_prior;
        for (class, row) in self.feature_log_prob.iter().enumerate() {
            // Start from "every feature absent", then swap in the present ones.
            let mut score: f64 = row.iter().map(|&lp| log_complement(lp)).sum();
            for (index, value) in features.iter() {
                if self.is_present(value) {
                    score += row[index] - log_complement(row[index]);
                }
            }
            jll[class] += score;
        }

        Ok(jll)
    }

    fn is_present(&self, value: f64) -> bool {
        match self.binarize {
            Some(threshold) => value > threshold,
            None => value != 0.0,
        }
    }
}

/// `ln(1 − exp(log_prob))`.
fn log_complement(log_prob: f64) -> f64 {
    (-log_prob.exp()).ln_1p()
}

impl Classifier for BernoulliNb {
    fn predict(&self, features: &FeatureVector) -> Result<Sentiment> {
        Ok(argmax(&self.classes, self.joint_log_likelihood(features)?))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities> {
        let jll = self.joint_log_likelihood(features)?;

        let max = jll[0].max(jll[1]);
        let log_sum = max + ((jll[0] - max).exp() + (jll[1] - max).exp()).ln();
        let values = [(jll[0] - log_sum).exp(), (jll[1] - log_sum).exp()];

        Ok(Probabilities::from_class_order(&self.classes, values))
    }

    fn n_features(&self) -> usize {
        self.feature_log_prob[0].len()
    }

    fn classes(&self) -> &[Sentiment; 2] {
        &self.classes
    }

    fn name(&self) -> &str {
        "bernoulli_nb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> BernoulliNb {
        // Feature 0 is mostly present in negative reviews, feature 1 in positive ones.
        BernoulliNb::new(
            Sentiment::ALL,
            [0.5f64.ln(), 0.5f64.ln()],
            [vec![0.8f64.ln(), 0.2f64.ln()], vec![0.2f64.ln(), 0.8f64.ln()]],
        )
        .unwrap()
    }

    fn features(entries: Vec<(usize, f64)>) -> FeatureVector {
        FeatureVector::from_entries(2, entries).unwrap()
    }

    #[test]
    fn test_predict() {
        let model = model();
        assert_eq!(model.predict(&features(vec![(0, 0.7)])).unwrap(), Sentiment::Negative);
        assert_eq!(model.predict(&features(vec![(1, 0.7)])).unwrap(), Sentiment::Positive);
    }

    #[test]
    fn test_predict_proba() {
        let model = model();
        let probabilities = model.predict_proba(&features(vec![(1, 0.3)])).unwrap();

        // P(x|pos) = 0.8 * 0.8, P(x|neg) = 0.2 * 0.2
        let expected = 0.64 / (0.64 + 0.04);
        assert!((probabilities.positive - expected).abs() < 1e-9);
        assert!((probabilities.negative + probabilities.positive - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_vector_uses_absence_terms() {
        let model = model();
        let probabilities = model.predict_proba(&FeatureVector::zeros(2)).unwrap();
        // Symmetric parameters give a tie, which goes to the first class.
        assert!((probabilities.positive - 0.5).abs() < 1e-12);
        assert_eq!(model.predict(&FeatureVector::zeros(2)).unwrap(), Sentiment::Negative);
    }

    #[test]
    fn test_binarize_threshold() {
        let model = model().with_binarize(Some(0.5));
        // 0.3 is below the threshold, so feature 1 counts as absent.
        let probabilities = model.predict_proba(&features(vec![(1, 0.3)])).unwrap();
        assert!((probabilities.positive - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = model();
        assert!(model.predict(&FeatureVector::zeros(3)).is_err());
        assert_eq!(model.n_features(), 2);
    }

    #[test]
    fn test_validation() {
        assert!(
            BernoulliNb::new(
                Sentiment::ALL,
                [0.5f64.ln(), 0.5f64.ln()],
                [vec![0.8f64.ln()], vec![0.2f64.ln(), 0.8f64.ln()]],
            )
            .is_err()
        );
        assert!(
            BernoulliNb::new(
                [Sentiment::Negative, Sentiment::Negative],
                [0.5f64.ln(), 0.5f64.ln()],
                [vec![0.8f64.ln()], vec![0.2f64.ln()]],
            )
            .is_err()
        );
        assert!(
            BernoulliNb::new(
                Sentiment::ALL,
                [0.5f64.ln(), 0.5f64.ln()],
                [vec![0.0], vec![0.2f64.ln()]],
            )
            .is_err()
        );
    }

    #[test]
    fn test_json_round_trip() {
        let model = model();
        let json = serde_json::to_string(&model).unwrap();
        let decoded: BernoulliNb = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, model);

        let bad_class = json.replace("\"positive\"", "\"neutral\"");
        assert!(serde_json::from_str::<BernoulliNb>(&bad_class).is_err());
    }
}
