//! Sentiment labels and per-class probabilities.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimenError};

/// The closed label domain of every classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Negative,
    Positive,
}

impl Sentiment {
    /// Both labels in their canonical class order.
    pub const ALL: [Sentiment; 2] = [Sentiment::Negative, Sentiment::Positive];

    /// Wire string of the label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Negative => "negative",
            Sentiment::Positive => "positive",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that a classifier's class list is exactly `{negative, positive}`.
pub fn validate_classes(classes: &[Sentiment; 2]) -> Result<()> {
    if classes[0] == classes[1] {
        return Err(SentimenError::model(format!(
            "classes must be negative and positive, got [{}, {}]",
            classes[0], classes[1]
        )));
    }
    Ok(())
}

/// Probability of each label. Both values lie in `[0, 1]` and sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub negative: f64,
    pub positive: f64,
}

impl Probabilities {
    /// Build from values listed in the order of `classes`.
    pub fn from_class_order(classes: &[Sentiment; 2], values: [f64; 2]) -> Self {
        let mut probabilities = Probabilities {
            negative: 0.0,
            positive: 0.0,
        };
        for (class, value) in classes.iter().zip(values) {
            match class {
                Sentiment::Negative => probabilities.negative = value,
                Sentiment::Positive => probabilities.positive = value,
            }
        }
        probabilities
    }

    /// Values listed in the order of `classes`.
    pub fn in_class_order(&self, classes: &[Sentiment; 2]) -> [f64; 2] {
        [self.get(classes[0]), self.get(classes[1])]
    }

    pub fn get(&self, label: Sentiment) -> f64 {
        match label {
            Sentiment::Negative => self.negative,
            Sentiment::Positive => self.positive,
        }
    }

    /// The larger of the two probabilities.
    pub fn max(&self) -> f64 {
        self.negative.max(self.positive)
    }

    /// Most probable label; a tie goes to `classes[0]`.
    pub fn argmax(&self, classes: &[Sentiment; 2]) -> Sentiment {
        argmax(classes, self.in_class_order(classes))
    }
}

/// Index-order argmax over two classes; a tie goes to the first class.
pub(crate) fn argmax(classes: &[Sentiment; 2], scores: [f64; 2]) -> Sentiment {
    if scores[1] > scores[0] {
        classes[1]
    } else {
        classes[0]
    }
}
