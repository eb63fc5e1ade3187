//! Result types of one review analysis.

use serde::{Deserialize, Serialize};

use crate::analysis::normalizer::NormalizationTrace;
use crate::ml::{Probabilities, Sentiment};

/// Confidence band of the ensemble's top probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    /// Above 80%.
    High,
    /// Above 60% up to and including 80%.
    Medium,
    /// 60% or less.
    Low,
}

impl ConfidenceBand {
    /// Band of a percentage in `[0, 100]`.
    pub fn from_percent(percent: f64) -> Self {
        if percent > 80.0 {
            ConfidenceBand::High
        } else if percent > 60.0 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "Tinggi",
            ConfidenceBand::Medium => "Sedang",
            ConfidenceBand::Low => "Rendah",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    /// Top ensemble probability times 100.
    pub percent: f64,
    pub band: ConfidenceBand,
}

impl Confidence {
    pub fn from_probabilities(probabilities: &Probabilities) -> Self {
        let percent = probabilities.max() * 100.0;
        Confidence {
            percent,
            band: ConfidenceBand::from_percent(percent),
        }
    }
}

/// Labels of the two base models for the same input. Independent of the
/// ensemble label; they may disagree with it and with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub bernoulli_nb: Sentiment,
    pub linear_svm: Sentiment,
}

impl ModelComparison {
    pub fn agrees_with(&self, label: Sentiment) -> bool {
        self.bernoulli_nb == label && self.linear_svm == label
    }
}

/// Toggles for one analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Also run the two base models.
    pub compare_models: bool,
    /// Keep the intermediate normalization strings.
    pub show_details: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions {
            compare_models: true,
            show_details: false,
        }
    }
}

/// Outcome of analyzing one review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub review: String,
    pub label: Sentiment,
    pub probabilities: Probabilities,
    pub confidence: Confidence,
    pub comparison: Option<ModelComparison>,
    pub details: Option<NormalizationTrace>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (80.0, ConfidenceBand::Medium),
            (80.1, ConfidenceBand::High),
            (60.0, ConfidenceBand::Low),
            (60.1, ConfidenceBand::Medium),
            (100.0, ConfidenceBand::High),
            (0.0, ConfidenceBand::Low),
        ];
        for (percent, band) in cases {
            assert_eq!(ConfidenceBand::from_percent(percent), band, "{percent}");
        }
    }

    #[test]
    fn test_band_labels() {
        assert_eq!(ConfidenceBand::High.label(), "Tinggi");
        assert_eq!(ConfidenceBand::Medium.label(), "Sedang");
        assert_eq!(ConfidenceBand::Low.label(), "Rendah");
    }

    #[test]
    fn test_confidence_from_probabilities() {
        let confidence = Confidence::from_probabilities(&Probabilities {
            negative: 0.25,
            positive: 0.75,
        });
        assert_eq!(confidence.percent, 75.0);
        assert_eq!(confidence.band, ConfidenceBand::Medium);

        let even = Confidence::from_probabilities(&Probabilities {
            negative: 0.5,
            positive: 0.5,
        });
        assert_eq!(even.band, ConfidenceBand::Low);
    }

    #[test]
    fn test_comparison_agreement() {
        let comparison = ModelComparison {
            bernoulli_nb: Sentiment::Positive,
            linear_svm: Sentiment::Negative,
        };
        assert!(!comparison.agrees_with(Sentiment::Positive));
        assert!(
            ModelComparison {
                bernoulli_nb: Sentiment::Negative,
                linear_svm: Sentiment::Negative,
            }
            .agrees_with(Sentiment::Negative)
        );
    }

    #[test]
    fn test_default_options() {
        let options = AnalyzeOptions::default();
        assert!(options.compare_models);
        assert!(!options.show_details);
    }
}
