//! Linear support vector machine with optional Platt calibration.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimenError};
use crate::ml::classifier::Classifier;
use crate::ml::features::FeatureVector;
use crate::ml::label::{Probabilities, Sentiment, validate_classes};

/// Sigmoid mapping from decision value to probability:
/// `P(classes[1]) = 1 / (1 + exp(a·f + b))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattCalibration {
    pub a: f64,
    pub b: f64,
}

impl PlattCalibration {
    pub fn probability(&self, decision: f64) -> f64 {
        1.0 / (1.0 + (self.a * decision + self.b).exp())
    }
}

/// A fitted linear SVM. A positive decision value selects `classes[1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvm {
    classes: [Sentiment; 2],
    coef: Vec<f64>,
    intercept: f64,
    #[serde(default)]
    calibration: Option<PlattCalibration>,
}

impl LinearSvm {
    pub fn new(classes: [Sentiment; 2], coef: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = LinearSvm {
            classes,
            coef,
            intercept,
            calibration: None,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn with_calibration(mut self, calibration: PlattCalibration) -> Self {
        self.calibration = Some(calibration);
        self
    }

    pub fn calibration(&self) -> Option<&PlattCalibration> {
        self.calibration.as_ref()
    }

    pub fn validate(&self) -> Result<()> {
        validate_classes(&self.classes)?;

        if self.coef.iter().any(|w| !w.is_finite()) || !self.intercept.is_finite() {
            return Err(SentimenError::model("coef and intercept must be finite"));
        }
        if let Some(calibration) = &self.calibration
            && !(calibration.a.is_finite() && calibration.b.is_finite())
        {
            return Err(SentimenError::model("calibration parameters must be finite"));
        }

        Ok(())
    }

    /// Signed distance to the separating hyperplane, `w·x + b`.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64> {
        Ok(features.dot(&self.coef)? + self.intercept)
    }
}

impl Classifier for LinearSvm {
    fn predict(&self, features: &FeatureVector) -> Result<Sentiment> {
        let decision = self.decision_function(features)?;
        Ok(if decision > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        })
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities> {
        let calibration = self.calibration.as_ref().ok_or_else(|| {
            SentimenError::model("linear_svm has no probability calibration")
        })?;

        let positive = calibration.probability(self.decision_function(features)?);
        Ok(Probabilities::from_class_order(
            &self.classes,
            [1.0 - positive, positive],
        ))
    }

    fn supports_proba(&self) -> bool {
        self.calibration.is_some()
    }

    fn n_features(&self) -> usize {
        self.coef.len()
    }

    fn classes(&self) -> &[Sentiment; 2] {
        &self.classes
    }

    fn name(&self) -> &str {
        "linear_svm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> LinearSvm {
        LinearSvm::new(Sentiment::ALL, vec![-2.0, 3.0], 0.5).unwrap()
    }

    fn features(entries: Vec<(usize, f64)>) -> FeatureVector {
        FeatureVector::from_entries(2, entries).unwrap()
    }

    #[test]
    fn test_decision_and_predict() {
        let model = model();

        let negative = features(vec![(0, 1.0)]);
        assert_eq!(model.decision_function(&negative).unwrap(), -1.5);
        assert_eq!(model.predict(&negative).unwrap(), Sentiment::Negative);

        let positive = features(vec![(1, 0.5)]);
        assert_eq!(model.decision_function(&positive).unwrap(), 2.0);
        assert_eq!(model.predict(&positive).unwrap(), Sentiment::Positive);
    }

    #[test]
    fn test_zero_decision_goes_to_first_class() {
        let model = LinearSvm::new(Sentiment::ALL, vec![1.0, 1.0], 0.0).unwrap();
        assert_eq!(model.predict(&FeatureVector::zeros(2)).unwrap(), Sentiment::Negative);
    }

    #[test]
    fn test_uncalibrated_proba_fails() {
        let model = model();
        assert!(!model.supports_proba());
        assert!(model.predict_proba(&FeatureVector::zeros(2)).is_err());
    }

    #[test]
    fn test_platt_calibration() {
        let model = model().with_calibration(PlattCalibration { a: -1.0, b: 0.0 });
        assert!(model.supports_proba());

        let probabilities = model.predict_proba(&features(vec![(1, 0.5)])).unwrap();
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert!((probabilities.positive - expected).abs() < 1e-12);
        assert!((probabilities.negative - (1.0 - expected)).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        assert!(model().predict(&FeatureVector::zeros(5)).is_err());
    }

    #[test]
    fn test_validation() {
        assert!(LinearSvm::new(Sentiment::ALL, vec![f64::NAN], 0.0).is_err());
        assert!(LinearSvm::new([Sentiment::Positive; 2], vec![1.0], 0.0).is_err());
    }
}
