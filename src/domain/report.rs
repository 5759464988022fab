//! Printable summary of an assessment.

use serde::{Deserialize, Serialize};

use super::diagnosis::Assessment;

pub const REPORT_TITLE: &str = "CardioPredict AI Prediction Report";

pub const REPORT_FILE_NAME: &str = "cardiopredict_ai_report.pdf";

pub const DISCLAIMER: &str =
    "Disclaimer: This is an educational tool. Consult a healthcare professional for medical advice.";

/// Renderer-independent report content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    /// Local generation time, `%Y-%m-%d %H:%M:%S`
    pub generated_at: String,
    pub inputs: Vec<(String, String)>,
    pub prediction: String,
    /// Probability formatted as a percentage with two decimals
    pub probability: String,
    pub risk_level: String,
    pub disclaimer: String,
}

impl ReportDocument {
    #[must_use]
    pub fn from_assessment(assessment: &Assessment) -> Self {
        let generated_at = assessment
            .assessed_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            inputs: assessment
                .record
                .summary()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            prediction: assessment.result.label.to_string(),
            probability: format!("{:.2}%", assessment.result.probability * 100.0),
            risk_level: assessment.risk_level().to_string(),
            disclaimer: DISCLAIMER.to_string(),
        }
    }
}
