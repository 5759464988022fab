//! Scaler port: Trait for the pre-fitted numeric transform.

/// Error type for scaler calls.
#[derive(Debug, thiserror::Error)]
pub enum ScalerError {
    #[error("Expected {expected} values, got {got}")]
    Width { expected: usize, got: usize },

    #[error("Invalid scaler parameters: {0}")]
    Parameters(String),
}

/// Trait for a fitted per-feature affine transform.
pub trait Scaler: Send + Sync {
    /// Columns the scaler was fitted on, in order.
    fn feature_names(&self) -> &[String];

    /// Transform one row of raw values.
    ///
    /// # Errors
    /// Returns `ScalerError::Width` if the row width does not match the fit.
    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ScalerError>;
}
