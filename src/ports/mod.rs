//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the fitted artifacts and document output.

mod classifier;
mod report;
mod scaler;

pub use classifier::{Classifier, ClassifierError};
pub use report::{ExportError, ReportRenderer};
pub use scaler::{Scaler, ScalerError};
