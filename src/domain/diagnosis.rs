//! Prediction result types.
//!
//! Represents the output of the random forest and its interpretation.

use serde::{Deserialize, Serialize};

use super::patient::PatientRecord;

/// Risk level classification for heart disease.
///
/// Thresholds are lower-bound inclusive: `p < 0.3` is low,
/// `0.3 <= p < 0.7` is moderate and `p >= 0.7` is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk of heart disease
    Low,
    /// Moderate risk, monitoring recommended
    Moderate,
    /// High risk, cardiology consultation recommended
    High,
}

impl RiskLevel {
    pub const MODERATE_THRESHOLD: f64 = 0.3;
    pub const HIGH_THRESHOLD: f64 = 0.7;

    /// Bucket a positive-class probability.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < Self::MODERATE_THRESHOLD {
            Self::Low
        } else if probability < Self::HIGH_THRESHOLD {
            Self::Moderate
        } else {
            Self::High
        }
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low concern",
            Self::Moderate => "Moderate concern",
            Self::High => "High concern",
        }
    }

    /// Guidance shown under the result.
    #[must_use]
    pub fn guidance(&self) -> &'static str {
        match self {
            Self::Low => "Maintain a healthy lifestyle.",
            Self::Moderate => {
                "Monitor your health and consult a doctor if symptoms persist."
            }
            Self::High => "Immediate consultation with a cardiologist is recommended.",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (76, 175, 80),     // #4CAF50
            Self::Moderate => (255, 193, 7), // #FFC107
            Self::High => (211, 47, 47),    // #D32F2F
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Binary class predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisLabel {
    NoDisease,
    DiseaseDetected,
}

impl DiagnosisLabel {
    /// Map a class value (1 = disease present) to a label.
    #[must_use]
    pub fn from_class(class: i64) -> Self {
        if class == 1 {
            Self::DiseaseDetected
        } else {
            Self::NoDisease
        }
    }
}

impl std::fmt::Display for DiagnosisLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoDisease => write!(f, "No Heart Disease"),
            Self::DiseaseDetected => write!(f, "Heart Disease Detected"),
        }
    }
}

/// Result of the classifier call (before interpretation).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class
    pub label: DiagnosisLabel,

    /// Probability of the positive class (0.0 to 1.0)
    pub probability: f64,
}

impl PredictionResult {
    #[must_use]
    pub fn new(label: DiagnosisLabel, probability: f64) -> Self {
        Self { label, probability }
    }

    /// Get the risk level based on probability thresholds.
    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_probability(self.probability)
    }
}

/// One completed submission: inputs, prediction and when it was made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub record: PatientRecord,
    pub result: PredictionResult,
    pub assessed_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(record: PatientRecord, result: PredictionResult) -> Self {
        Self {
            record,
            result,
            assessed_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.result.risk_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_from_probability() {
        assert_eq!(RiskLevel::from_probability(0.1), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.5), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.71), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_boundaries_are_lower_inclusive() {
        assert_eq!(RiskLevel::from_probability(0.30), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_probability(0.70), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::High);
    }

    #[test]
    fn test_label_from_class() {
        assert_eq!(DiagnosisLabel::from_class(1), DiagnosisLabel::DiseaseDetected);
        assert_eq!(DiagnosisLabel::from_class(0), DiagnosisLabel::NoDisease);
        assert_eq!(
            DiagnosisLabel::DiseaseDetected.to_string(),
            "Heart Disease Detected"
        );
    }

    #[test]
    fn test_result_risk_level() {
        let result = PredictionResult::new(DiagnosisLabel::DiseaseDetected, 0.82);
        assert_eq!(result.risk_level(), RiskLevel::High);
    }
}
