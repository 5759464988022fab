//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: loading and integrity checks for the model directory
//! - `forest`: random forest classifier evaluated from exported trees
//! - `scaler`: fitted standard / min-max scalers
//! - `pdf`: PDF rendering of prediction reports
//! - `sanitize`: PII filtering for logs

pub mod artifacts;
pub mod forest;
pub mod pdf;
pub mod sanitize;
pub mod scaler;

pub use artifacts::ArtifactError;
