//! # CardioPredict
//!
//! Heart disease risk assessment from a pre-trained random forest.
//!
//! This crate provides:
//! - Loading and integrity checking of the classifier and scaler artifacts
//! - Feature encoding (one-hot expansion, scaling, schema-driven reordering)
//! - Risk tiering and a PDF summary export
//! - Terminal UI for entering patient vitals
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (PatientRecord, FeatureSchema, PredictionResult)
//! - `ports`: Trait definitions for the classifier, scaler and report renderer
//! - `adapters`: Concrete implementations (random forest, scalers, PDF, artifact loader)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::AppConfig;
pub use domain::{Assessment, PatientRecord, PredictionResult, RiskLevel};

/// Result type for CardioPredict operations
pub type Result<T> = std::result::Result<T, CardioError>;

/// Main error type for CardioPredict
#[derive(Debug, thiserror::Error)]
pub enum CardioError {
    #[error(transparent)]
    Artifact(#[from] adapters::ArtifactError),

    #[error("Please complete all fields: {}", .0.join("; "))]
    IncompleteInput(Vec<String>),

    #[error("Feature contract mismatch: {0}")]
    FeatureContractMismatch(String),

    #[error("Feature encoding failed: {0}")]
    Encoding(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Report export failed: {0}")]
    Export(#[from] ports::ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
