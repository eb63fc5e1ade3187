//! Voting ensemble over the base classifiers.
//!
//! Soft voting averages the estimators' probabilities (optionally weighted)
//! and takes the argmax. Hard voting counts weighted label votes and cannot
//! produce probabilities. Ties go to the first class in both modes.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimenError};
use crate::ml::bernoulli_nb::BernoulliNb;
use crate::ml::classifier::Classifier;
use crate::ml::features::FeatureVector;
use crate::ml::label::{Probabilities, Sentiment, argmax, validate_classes};
use crate::ml::linear_svm::LinearSvm;

/// How estimator outputs are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Voting {
    #[default]
    Soft,
    Hard,
}

/// One of the supported base model kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    BernoulliNb(BernoulliNb),
    LinearSvm(LinearSvm),
}

impl Estimator {
    fn as_classifier(&self) -> &dyn Classifier {
        match self {
            Estimator::BernoulliNb(model) => model,
            Estimator::LinearSvm(model) => model,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Estimator::BernoulliNb(model) => model.validate(),
            Estimator::LinearSvm(model) => model.validate(),
        }
    }
}

impl Classifier for Estimator {
    fn predict(&self, features: &FeatureVector) -> Result<Sentiment> {
        self.as_classifier().predict(features)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities> {
        self.as_classifier().predict_proba(features)
    }

    fn supports_proba(&self) -> bool {
        self.as_classifier().supports_proba()
    }

    fn n_features(&self) -> usize {
        self.as_classifier().n_features()
    }

    fn classes(&self) -> &[Sentiment; 2] {
        self.as_classifier().classes()
    }

    fn name(&self) -> &str {
        self.as_classifier().name()
    }
}

/// An estimator together with the name it was registered under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedEstimator {
    pub name: String,
    pub estimator: Estimator,
}

impl NamedEstimator {
    pub fn new<S: Into<String>>(name: S, estimator: Estimator) -> Self {
        NamedEstimator {
            name: name.into(),
            estimator,
        }
    }
}

/// A fitted voting ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VotingClassifier {
    classes: [Sentiment; 2],
    estimators: Vec<NamedEstimator>,
    #[serde(default)]
    voting: Voting,
    /// One weight per estimator; `None` weighs them equally.
    #[serde(default)]
    weights: Option<Vec<f64>>,
}

impl VotingClassifier {
    pub fn new(
        classes: [Sentiment; 2],
        estimators: Vec<NamedEstimator>,
        voting: Voting,
        weights: Option<Vec<f64>>,
    ) -> Result<Self> {
        let model = VotingClassifier {
            classes,
            estimators,
            voting,
            weights,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn voting(&self) -> Voting {
        self.voting
    }

    pub fn estimators(&self) -> &[NamedEstimator] {
        &self.estimators
    }

    pub fn weights(&self) -> Option<&[f64]> {
        self.weights.as_deref()
    }

    /// Check the ensemble and every estimator in it.
    pub fn validate(&self) -> Result<()> {
        validate_classes(&self.classes)?;

        if self.estimators.is_empty() {
            return Err(SentimenError::model("voting ensemble has no estimators"));
        }

        if let Some(weights) = &self.weights {
            if weights.len() != self.estimators.len() {
                return Err(SentimenError::model(format!(
                    "{} weights given for {} estimators",
                    weights.len(),
                    self.estimators.len()
                )));
            }
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                return Err(SentimenError::model("weights must be finite and non-negative"));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                return Err(SentimenError::model("weights must not all be zero"));
            }
        }

        let n_features = self.estimators[0].estimator.n_features();
        for NamedEstimator { name, estimator } in &self.estimators {
            estimator
                .validate()
                .map_err(|e| SentimenError::model(format!("estimator '{name}': {e}")))?;

            if estimator.n_features() != n_features {
                return Err(SentimenError::model(format!(
                    "estimator '{name}' expects {} features, '{}' expects {n_features}",
                    estimator.n_features(),
                    self.estimators[0].name
                )));
            }
            if self.voting == Voting::Soft && !estimator.supports_proba() {
                return Err(SentimenError::model(format!(
                    "soft voting needs probabilities, but estimator '{name}' has none"
                )));
            }
        }

        Ok(())
    }

    fn weight(&self, position: usize) -> f64 {
        self.weights
            .as_ref()
            .map_or(1.0, |weights| weights[position])
    }

    /// Weighted average of estimator probabilities, in ensemble class order.
    fn average_proba(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        let mut totals = [0.0; 2];
        let mut weight_sum = 0.0;

        for (position, named) in self.estimators.iter().enumerate() {
            let weight = self.weight(position);
            let probabilities = named.estimator.predict_proba(features)?;
            let values = probabilities.in_class_order(&self.classes);
            for (total, value) in totals.iter_mut().zip(values) {
                *total += weight * value;
            }
            weight_sum += weight;
        }

        Ok([totals[0] / weight_sum, totals[1] / weight_sum])
    }

    /// Weighted label counts, in ensemble class order.
    fn vote_counts(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        let mut counts = [0.0; 2];
        for (position, named) in self.estimators.iter().enumerate() {
            let label = named.estimator.predict(features)?;
            let slot = if label == self.classes[0] { 0 } else { 1 };
            counts[slot] += self.weight(position);
        }
        Ok(counts)
    }
}

impl Classifier for VotingClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<Sentiment> {
        let scores = match self.voting {
            Voting::Soft => self.average_proba(features)?,
            Voting::Hard => self.vote_counts(features)?,
        };
        debug!("{} voting scores {scores:?}", self.name());
        Ok(argmax(&self.classes, scores))
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities> {
        match self.voting {
            Voting::Soft => Ok(Probabilities::from_class_order(
                &self.classes,
                self.average_proba(features)?,
            )),
            Voting::Hard => Err(SentimenError::model(
                "predict_proba is not available when voting is 'hard'",
            )),
        }
    }

    fn supports_proba(&self) -> bool {
        self.voting == Voting::Soft
    }

    fn n_features(&self) -> usize {
        self.estimators
            .first()
            .map_or(0, |named| named.estimator.n_features())
    }

    fn classes(&self) -> &[Sentiment; 2] {
        &self.classes
    }

    fn name(&self) -> &str {
        "ensemble_voting"
    }
}
