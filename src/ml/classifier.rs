//! Classifier trait definition.

use crate::error::Result;
use crate::ml::features::FeatureVector;
use crate::ml::label::{Probabilities, Sentiment};

/// A fitted binary sentiment classifier over TF-IDF features.
///
/// Implementations are immutable after loading and may be shared across
/// threads.
pub trait Classifier: Send + Sync {
    /// Predict the label of one feature vector.
    fn predict(&self, features: &FeatureVector) -> Result<Sentiment>;

    /// Per-class probabilities of one feature vector.
    ///
    /// Fails for models that cannot produce probabilities.
    fn predict_proba(&self, features: &FeatureVector) -> Result<Probabilities>;

    /// Whether [`Classifier::predict_proba`] is available.
    fn supports_proba(&self) -> bool {
        true
    }

    /// Number of input features the model was fitted on.
    fn n_features(&self) -> usize;

    /// Class order of the model's internal parameters.
    fn classes(&self) -> &[Sentiment; 2];

    /// Get the name of this classifier for debugging and logging.
    fn name(&self) -> &str;
}
