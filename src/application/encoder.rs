//! Feature encoder: turns a validated record into the classifier's input row.
//!
//! Steps:
//! - scale the six numeric measurements with the fitted scaler
//! - expand the categorical findings into the six retained indicators
//! - place every value at its column position from the [`FeatureSchema`]

use std::sync::Arc;

use crate::adapters::ArtifactError;
use crate::domain::{EncodedFeatureVector, FeatureSchema, PatientRecord, NUMERIC_COLUMNS};
use crate::ports::Scaler;
use crate::CardioError;

/// One-hot indicators in `INDICATOR_COLUMNS` order.
///
/// Chest pain 1 and 3 and resting ECG 0 and 1 have no column and encode as
/// all zeros within their group.
#[must_use]
pub fn indicators(record: &PatientRecord) -> [f64; 6] {
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let cp = record.chest_pain.code();
    let ecg = record.resting_ecg.code();
    let slope = record.st_slope.code();
    [
        flag(cp == 2),
        flag(cp == 4),
        flag(ecg == 2),
        flag(slope == 1),
        flag(slope == 2),
        flag(slope == 3),
    ]
}

/// Schema-driven encoder over a fitted scaler.
pub struct FeatureEncoder<S: Scaler> {
    scaler: Arc<S>,
    schema: FeatureSchema,
    /// Output position of each canonical column.
    positions: Vec<usize>,
}

impl<S: Scaler> FeatureEncoder<S> {
    /// Create an encoder.
    ///
    /// # Errors
    /// Returns `ArtifactError::FeatureContractMismatch` if the schema is not a
    /// permutation of the known columns or the scaler was fitted on other
    /// columns.
    pub fn new(scaler: Arc<S>, schema: FeatureSchema) -> Result<Self, ArtifactError> {
        let positions = schema
            .permutation()
            .map_err(ArtifactError::FeatureContractMismatch)?;

        if !scaler
            .feature_names()
            .iter()
            .map(String::as_str)
            .eq(NUMERIC_COLUMNS)
        {
            return Err(ArtifactError::FeatureContractMismatch(format!(
                "scaler was fitted on {:?}, expected {NUMERIC_COLUMNS:?}",
                scaler.feature_names()
            )));
        }

        Ok(Self {
            scaler,
            schema,
            positions,
        })
    }

    /// Encode one record. Identical records give identical vectors.
    ///
    /// # Errors
    /// Returns `CardioError::Encoding` if the scaler fails.
    pub fn encode(&self, record: &PatientRecord) -> Result<EncodedFeatureVector, CardioError> {
        let scaled = self
            .scaler
            .transform(&record.numeric_values())
            .map_err(|e| CardioError::Encoding(e.to_string()))?;
        if scaled.len() != NUMERIC_COLUMNS.len() {
            return Err(CardioError::Encoding(format!(
                "scaler returned {} values, expected {}",
                scaled.len(),
                NUMERIC_COLUMNS.len()
            )));
        }

        let mut values = vec![0.0; self.schema.len()];
        for (canonical, value) in scaled.into_iter().chain(indicators(record)).enumerate() {
            values[self.positions[canonical]] = value;
        }

        EncodedFeatureVector::new(self.schema.columns.clone(), values).map_err(CardioError::Encoding)
    }
}
