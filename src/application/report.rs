//! Report service: builds and saves the downloadable prediction report.

use std::path::PathBuf;

use crate::domain::{Assessment, ReportDocument, REPORT_FILE_NAME};
use crate::ports::{ExportError, ReportRenderer};

/// Service producing report documents for assessments.
pub struct ReportService<R: ReportRenderer> {
    renderer: R,
    export_dir: PathBuf,
}

impl<R: ReportRenderer> ReportService<R> {
    pub fn new(renderer: R, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            renderer,
            export_dir: export_dir.into(),
        }
    }

    /// Path the report is saved to.
    #[must_use]
    pub fn target_path(&self) -> PathBuf {
        self.export_dir.join(REPORT_FILE_NAME)
    }

    /// Render the report for an assessment.
    ///
    /// # Errors
    /// Returns `ExportError::Render` if the renderer fails.
    pub fn build(&self, assessment: &Assessment) -> Result<Vec<u8>, ExportError> {
        let document = ReportDocument::from_assessment(assessment);
        let bytes = self.renderer.render(&document)?;
        tracing::debug!(
            "Built {} report ({} bytes)",
            self.renderer.content_type(),
            bytes.len()
        );
        Ok(bytes)
    }

    /// Write previously built report bytes into the export directory,
    /// replacing any earlier report.
    ///
    /// # Errors
    /// Returns `ExportError::Write` if the directory or file cannot be written.
    pub fn save(&self, bytes: &[u8]) -> Result<PathBuf, ExportError> {
        let path = self.target_path();
        std::fs::create_dir_all(&self.export_dir)
            .and_then(|()| std::fs::write(&path, bytes))
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::info!("Report saved to {:?}", path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::pdf::PdfReportRenderer;
    use crate::domain::{DiagnosisLabel, PatientDraft, PatientRecord, PredictionResult};
    use tempfile::tempdir;

    fn assessment() -> Assessment {
        let draft = PatientDraft {
            age: Some(63.0),
            resting_bp: Some(145.0),
            cholesterol: Some(233.0),
            max_heart_rate: Some(150.0),
            st_depression: Some(2.3),
            major_vessels: Some(0.0),
            chest_pain: Some(1),
            resting_ecg: Some(2),
            st_slope: Some(3),
        };
        let record = PatientRecord::try_from(&draft).expect("valid record");
        Assessment::new(
            record,
            PredictionResult::new(DiagnosisLabel::DiseaseDetected, 0.82),
        )
    }

    #[test]
    fn test_build_and_save_pdf() {
        let temp = tempdir().expect("tempdir");
        let export_dir = temp.path().join("reports");
        let service = ReportService::new(PdfReportRenderer::new(), &export_dir);

        let bytes = service.build(&assessment()).expect("Should build");
        assert!(bytes.starts_with(b"%PDF"));
        let document = ReportDocument::from_assessment(&assessment());
        assert_eq!(document.probability, "82.00%");
        assert_eq!(document.risk_level, "HIGH");
        assert!(document
            .inputs
            .contains(&("ST Depression".to_string(), "2.3".to_string())));

        let path = service.save(&bytes).expect("Should save");
        assert_eq!(path, export_dir.join(REPORT_FILE_NAME));
        assert_eq!(std::fs::read(&path).expect("read back"), bytes);
    }

    #[test]
    fn test_save_into_file_path_fails() {
        let temp = tempdir().expect("tempdir");
        let blocker = temp.path().join("not_a_dir");
        std::fs::write(&blocker, b"x").unwrap();

        let service = ReportService::new(PdfReportRenderer::new(), &blocker);
        let err = service.save(b"%PDF").expect_err("must fail");
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
