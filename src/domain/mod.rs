//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable and implement strict validation.

mod diagnosis;
mod features;
mod patient;
mod report;

pub use diagnosis::{Assessment, DiagnosisLabel, PredictionResult, RiskLevel};
pub use features::{
    EncodedFeatureVector, FeatureSchema, INDICATOR_COLUMNS, MODEL_COLUMNS, NUMERIC_COLUMNS,
};
pub use patient::{ChestPainType, PatientDraft, PatientRecord, RestingEcg, StSlope};
pub use report::{ReportDocument, DISCLAIMER, REPORT_FILE_NAME, REPORT_TITLE};
