//! Feature schema and encoded feature vectors.
//!
//! The classifier was trained on a fixed column order. That order is held as
//! data in a [`FeatureSchema`] so it can follow the artifact if it changes.

use serde::{Deserialize, Serialize};

/// Numeric columns, in the order the scaler was fitted on.
pub const NUMERIC_COLUMNS: [&str; 6] = ["age", "trestbps", "chol", "thalach", "oldpeak", "ca"];

/// One-hot indicator columns kept by the trained model.
///
/// Chest pain 1 and 3 and resting ECG 0 and 1 are reference categories and
/// have no column of their own.
pub const INDICATOR_COLUMNS: [&str; 6] = [
    "cp_2.0",
    "cp_4.0",
    "restecg_2.0",
    "slope_1.0",
    "slope_2.0",
    "slope_3.0",
];

/// Column order of the bundled random forest (schema `heart-rf` v1).
pub const MODEL_COLUMNS: [&str; 12] = [
    "trestbps",
    "slope_2.0",
    "chol",
    "slope_1.0",
    "thalach",
    "oldpeak",
    "ca",
    "age",
    "slope_3.0",
    "cp_2.0",
    "restecg_2.0",
    "cp_4.0",
];

/// Named, versioned column order expected by a classifier artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub name: String,
    pub version: u32,
    pub columns: Vec<String>,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self {
            name: "heart-rf".to_string(),
            version: 1,
            columns: MODEL_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

impl FeatureSchema {
    /// Columns in encoder order: the six numeric columns, then the six indicators.
    pub fn canonical_columns() -> impl Iterator<Item = &'static str> {
        NUMERIC_COLUMNS.into_iter().chain(INDICATOR_COLUMNS)
    }

    /// Number of columns in the schema.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of each canonical column inside this schema.
    ///
    /// # Errors
    /// Returns a description of the problem when the schema is not an exact
    /// permutation of the twelve known columns.
    pub fn permutation(&self) -> Result<Vec<usize>, String> {
        let canonical: Vec<&str> = Self::canonical_columns().collect();
        if self.columns.len() != canonical.len() {
            return Err(format!(
                "schema {} v{} has {} columns, expected {}",
                self.name,
                self.version,
                self.columns.len(),
                canonical.len()
            ));
        }

        for (i, column) in self.columns.iter().enumerate() {
            if !canonical.contains(&column.as_str()) {
                return Err(format!("unknown column {column:?} in schema"));
            }
            if self.columns[..i].contains(column) {
                return Err(format!("duplicate column {column:?} in schema"));
            }
        }

        Ok(canonical
            .iter()
            .map(|c| {
                self.columns
                    .iter()
                    .position(|s| s == c)
                    .unwrap_or_default()
            })
            .collect())
    }

    /// Check that the classifier and scaler artifacts agree with this schema.
    ///
    /// The classifier must name exactly the schema columns in schema order,
    /// and the scaler must name the numeric columns in fitted order.
    ///
    /// # Errors
    /// Returns a description of the first disagreement found.
    pub fn check_contract(
        &self,
        classifier_columns: &[String],
        scaler_columns: &[String],
    ) -> Result<(), String> {
        self.permutation()?;

        if classifier_columns != self.columns.as_slice() {
            return Err(format!(
                "classifier expects {classifier_columns:?}, schema {} v{} declares {:?}",
                self.name, self.version, self.columns
            ));
        }
        if !scaler_columns.iter().map(String::as_str).eq(NUMERIC_COLUMNS) {
            return Err(format!(
                "scaler was fitted on {scaler_columns:?}, expected {NUMERIC_COLUMNS:?}"
            ));
        }
        Ok(())
    }
}

/// Model input: named values in schema order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl EncodedFeatureVector {
    /// Pair column names with values.
    ///
    /// # Errors
    /// Returns error if the lengths differ.
    pub fn new(columns: Vec<String>, values: Vec<f64>) -> Result<Self, String> {
        if columns.len() != values.len() {
            return Err(format!(
                "{} column names for {} values",
                columns.len(),
                values.len()
            ));
        }
        Ok(Self { columns, values })
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a named column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_is_valid_permutation() {
        let schema = FeatureSchema::default();
        assert_eq!(schema.len(), 12);

        let perm = schema.permutation().expect("Should be valid");
        // age is canonical index 0 and sits at position 7 in the model order.
        assert_eq!(perm[0], 7);
        // slope_3.0 is canonical index 11 and sits at position 8.
        assert_eq!(perm[11], 8);
    }

    #[test]
    fn test_schema_rejects_unknown_and_duplicate_columns() {
        let mut schema = FeatureSchema::default();
        schema.columns[0] = "thal".to_string();
        assert!(schema.permutation().unwrap_err().contains("unknown"));

        let mut schema = FeatureSchema::default();
        schema.columns[0] = "age".to_string();
        assert!(schema.permutation().unwrap_err().contains("duplicate"));

        let mut schema = FeatureSchema::default();
        schema.columns.pop();
        assert!(schema.permutation().unwrap_err().contains("11 columns"));
    }

    #[test]
    fn test_contract_check() {
        let schema = FeatureSchema::default();
        let scaler: Vec<String> = NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect();

        assert!(schema.check_contract(&schema.columns, &scaler).is_ok());

        let mut reordered = schema.columns.clone();
        reordered.swap(0, 1);
        assert!(schema.check_contract(&reordered, &scaler).is_err());

        let mut wrong_scaler = scaler.clone();
        wrong_scaler.reverse();
        let err = schema
            .check_contract(&schema.columns, &wrong_scaler)
            .unwrap_err();
        assert!(err.contains("scaler"));
    }

    #[test]
    fn test_vector_lookup_by_name() {
        let v = EncodedFeatureVector::new(
            vec!["a".into(), "b".into()],
            vec![1.0, 2.0],
        )
        .expect("Should build");
        assert_eq!(v.get("b"), Some(2.0));
        assert_eq!(v.get("c"), None);
        assert!(EncodedFeatureVector::new(vec!["a".into()], vec![]).is_err());
    }
}
