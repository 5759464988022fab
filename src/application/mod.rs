//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod encoder;
mod prediction;
mod report;

pub use encoder::{indicators, FeatureEncoder};
pub use prediction::PredictionService;
pub use report::ReportService;

#[cfg(test)]
pub(crate) use prediction::tests as test_support;
