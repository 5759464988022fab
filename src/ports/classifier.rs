//! Classifier port: Trait for the pre-trained model.

use crate::domain::PredictionResult;

/// Error type for classifier calls.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Expected {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("Non-finite feature value at column {0}")]
    NonFiniteInput(usize),

    #[error("Malformed model: {0}")]
    Malformed(String),
}

/// Trait for a fitted binary classifier.
///
/// Implementations must be deterministic: the same input always yields the
/// same label and probability.
pub trait Classifier: Send + Sync {
    /// Input columns the model was trained on, in order.
    fn feature_names(&self) -> &[String];

    /// Predict the class label and positive-class probability for one row.
    ///
    /// # Errors
    /// Returns `ClassifierError::FeatureCount` if the row has the wrong width.
    fn predict(&self, features: &[f64]) -> Result<PredictionResult, ClassifierError>;
}
