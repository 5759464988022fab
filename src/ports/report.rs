//! Report port: Trait for turning a report into a downloadable document.

use crate::domain::ReportDocument;

/// Error type for report generation and export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Document generation failed: {0}")]
    Render(String),

    #[error("Failed to write report to {path:?}: {source}")]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Trait for document renderers.
pub trait ReportRenderer: Send + Sync {
    /// MIME type of the produced document.
    fn content_type(&self) -> &'static str;

    /// Render the report into document bytes.
    ///
    /// # Errors
    /// Returns `ExportError::Render` if the document cannot be produced.
    fn render(&self, report: &ReportDocument) -> Result<Vec<u8>, ExportError>;
}
