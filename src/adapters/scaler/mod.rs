//! Scaler adapter: Implementation of Scaler for exported fitted transforms.
//!
//! `scaler.json` is tagged by `kind`:
//! - `standard`: `(x - mean) / scale`
//! - `min_max`: maps `[data_min, data_max]` onto `feature_range`

use serde::{Deserialize, Serialize};

use crate::ports::{Scaler, ScalerError};

/// Standardization with stored per-feature mean and scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Min-max rescaling with stored per-feature data range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    pub feature_names: Vec<String>,
    pub data_min: Vec<f64>,
    pub data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
}

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// A fitted scaler as found in the artifact directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedScaler {
    Standard(StandardScaler),
    MinMax(MinMaxScaler),
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

impl FittedScaler {
    /// Parse and validate a scaler from JSON.
    ///
    /// # Errors
    /// Returns `ScalerError::Parameters` on invalid JSON or parameters.
    pub fn from_json(json: &str) -> Result<Self, ScalerError> {
        let scaler: Self =
            serde_json::from_str(json).map_err(|e| ScalerError::Parameters(e.to_string()))?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Check parameter lengths and values.
    ///
    /// # Errors
    /// Returns `ScalerError::Parameters` describing the problem.
    pub fn validate(&self) -> Result<(), ScalerError> {
        match self {
            Self::Standard(s) => {
                let n = s.feature_names.len();
                if n == 0 || s.mean.len() != n || s.scale.len() != n {
                    return Err(ScalerError::Parameters(
                        "mean/scale lengths do not match feature_names".into(),
                    ));
                }
                if !all_finite(&s.mean) || !all_finite(&s.scale) {
                    return Err(ScalerError::Parameters("non-finite parameter".into()));
                }
                if s.scale.iter().any(|v| *v == 0.0) {
                    return Err(ScalerError::Parameters("zero scale".into()));
                }
            }
            Self::MinMax(s) => {
                let n = s.feature_names.len();
                if n == 0 || s.data_min.len() != n || s.data_max.len() != n {
                    return Err(ScalerError::Parameters(
                        "data_min/data_max lengths do not match feature_names".into(),
                    ));
                }
                if !all_finite(&s.data_min) || !all_finite(&s.data_max) {
                    return Err(ScalerError::Parameters("non-finite parameter".into()));
                }
                let (lo, hi) = s.feature_range;
                if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                    return Err(ScalerError::Parameters(format!(
                        "invalid feature_range ({lo}, {hi})"
                    )));
                }
            }
        }
        Ok(())
    }
}

impl Scaler for FittedScaler {
    fn feature_names(&self) -> &[String] {
        match self {
            Self::Standard(s) => &s.feature_names,
            Self::MinMax(s) => &s.feature_names,
        }
    }

    fn transform(&self, values: &[f64]) -> Result<Vec<f64>, ScalerError> {
        let expected = self.feature_names().len();
        if values.len() != expected {
            return Err(ScalerError::Width {
                expected,
                got: values.len(),
            });
        }

        let out = match self {
            Self::Standard(s) => values
                .iter()
                .zip(s.mean.iter().zip(&s.scale))
                .map(|(x, (mean, scale))| (x - mean) / scale)
                .collect(),
            Self::MinMax(s) => {
                let (lo, hi) = s.feature_range;
                values
                    .iter()
                    .zip(s.data_min.iter().zip(&s.data_max))
                    .map(|(x, (min, max))| {
                        // Constant features keep a unit range.
                        let range = if max - min == 0.0 { 1.0 } else { max - min };
                        let scale = (hi - lo) / range;
                        x * scale + (lo - min * scale)
                    })
                    .collect()
            }
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("f{i}")).collect()
    }

    #[test]
    fn test_standard_transform() {
        let scaler = FittedScaler::Standard(StandardScaler {
            feature_names: names(2),
            mean: vec![10.0, 0.0],
            scale: vec![2.0, 0.5],
        });
        let out = scaler.transform(&[14.0, 1.0]).expect("Should transform");
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert!((out[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_min_max_transform() {
        let scaler = FittedScaler::MinMax(MinMaxScaler {
            feature_names: names(2),
            data_min: vec![100.0, 5.0],
            data_max: vec![600.0, 5.0],
            feature_range: (0.0, 1.0),
        });
        let out = scaler.transform(&[350.0, 7.0]).expect("Should transform");
        assert!((out[0] - 0.5).abs() < 1e-12);
        // Constant feature: shifted by data_min, unit range.
        assert!((out[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_width_mismatch() {
        let scaler = FittedScaler::Standard(StandardScaler {
            feature_names: names(2),
            mean: vec![0.0, 0.0],
            scale: vec![1.0, 1.0],
        });
        assert!(matches!(
            scaler.transform(&[1.0]),
            Err(ScalerError::Width { expected: 2, got: 1 })
        ));
    }

    #[test]
    fn test_from_json_tagged() {
        let json = r#"{"kind":"min_max","feature_names":["a"],"data_min":[0.0],"data_max":[4.0]}"#;
        let scaler = FittedScaler::from_json(json).expect("Should parse");
        let out = scaler.transform(&[1.0]).expect("Should transform");
        assert!((out[0] - 0.25).abs() < 1e-12);

        let bad = r#"{"kind":"standard","feature_names":["a"],"mean":[0.0],"scale":[0.0]}"#;
        assert!(FittedScaler::from_json(bad).is_err());
        assert!(FittedScaler::from_json(r#"{"kind":"robust"}"#).is_err());
    }
}
