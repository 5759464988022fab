//! Prediction service: validation, encoding and the classifier call.
//!
//! A submission goes through:
//! 1. Completeness and range validation of the draft
//! 2. Feature encoding (scaling, one-hot expansion, schema order)
//! 3. Column contract check against the classifier's declared inputs
//! 4. A single deterministic classifier call
//!
//! Nothing is persisted. The returned [`Assessment`] is owned by the caller.

use std::sync::Arc;

use crate::adapters::ArtifactError;
use crate::domain::{Assessment, EncodedFeatureVector, FeatureSchema, PatientDraft, PatientRecord};
use crate::ports::{Classifier, Scaler};
use crate::CardioError;

use super::encoder::FeatureEncoder;

/// Service running heart disease predictions against loaded artifacts.
pub struct PredictionService<C, S>
where
    C: Classifier,
    S: Scaler,
{
    classifier: Arc<C>,
    encoder: FeatureEncoder<S>,
}

impl<C, S> PredictionService<C, S>
where
    C: Classifier,
    S: Scaler,
{
    /// Create a new prediction service.
    ///
    /// # Errors
    /// Returns `ArtifactError::FeatureContractMismatch` if the classifier,
    /// scaler and schema disagree on columns.
    pub fn new(
        classifier: Arc<C>,
        scaler: Arc<S>,
        schema: FeatureSchema,
    ) -> Result<Self, ArtifactError> {
        schema
            .check_contract(classifier.feature_names(), scaler.feature_names())
            .map_err(ArtifactError::FeatureContractMismatch)?;
        let encoder = FeatureEncoder::new(scaler, schema)?;
        Ok(Self {
            classifier,
            encoder,
        })
    }

    /// Validate a form submission and assess it.
    ///
    /// # Errors
    /// Returns `CardioError::IncompleteInput` listing every unset or invalid
    /// field; the classifier is not called in that case.
    pub fn submit(&self, draft: &PatientDraft) -> Result<Assessment, CardioError> {
        let record = PatientRecord::try_from(draft).map_err(|errors| {
            tracing::info!("Submission rejected: {} field problem(s)", errors.len());
            CardioError::IncompleteInput(errors)
        })?;
        self.assess(&record)
    }

    /// Encode a validated record and run the classifier once.
    ///
    /// # Errors
    /// - `CardioError::Encoding` if scaling fails
    /// - `CardioError::FeatureContractMismatch` if the vector does not match
    ///   the classifier inputs
    /// - `CardioError::Inference` if the classifier fails
    pub fn assess(&self, record: &PatientRecord) -> Result<Assessment, CardioError> {
        tracing::debug!("Encoding features...");
        let vector = self.encoder.encode(record)?;
        self.check_vector(&vector)?;

        tracing::debug!("Running classifier...");
        let result = self
            .classifier
            .predict(vector.values())
            .map_err(|e| CardioError::Inference(e.to_string()))?;

        let assessment = Assessment::new(*record, result);
        tracing::info!("Prediction complete: risk={}", assessment.risk_level());
        Ok(assessment)
    }

    fn check_vector(&self, vector: &EncodedFeatureVector) -> Result<(), CardioError> {
        let expected = self.classifier.feature_names();
        if vector.len() != expected.len() {
            return Err(CardioError::FeatureContractMismatch(format!(
                "encoded {} features, classifier expects {}",
                vector.len(),
                expected.len()
            )));
        }
        if vector.columns() != expected {
            return Err(CardioError::FeatureContractMismatch(format!(
                "encoded columns {:?} differ from classifier columns {expected:?}",
                vector.columns()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::adapters::scaler::{FittedScaler, StandardScaler};
    use crate::domain::{DiagnosisLabel, PredictionResult, RiskLevel, NUMERIC_COLUMNS};
    use crate::ports::ClassifierError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Classifier returning a fixed probability and recording its calls.
    pub(crate) struct MockClassifier {
        names: Vec<String>,
        probability: f64,
        pub(crate) calls: AtomicUsize,
        pub(crate) last_input: Mutex<Vec<f64>>,
    }

    impl MockClassifier {
        pub(crate) fn new(probability: f64) -> Self {
            Self {
                names: FeatureSchema::default().columns,
                probability,
                calls: AtomicUsize::new(0),
                last_input: Mutex::new(Vec::new()),
            }
        }
    }

    impl Classifier for MockClassifier {
        fn feature_names(&self) -> &[String] {
            &self.names
        }

        fn predict(&self, features: &[f64]) -> Result<PredictionResult, ClassifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = features.to_vec();
            let label = if self.probability >= 0.5 {
                DiagnosisLabel::DiseaseDetected
            } else {
                DiagnosisLabel::NoDisease
            };
            Ok(PredictionResult::new(label, self.probability))
        }
    }

    pub(crate) fn identity_scaler() -> FittedScaler {
        FittedScaler::Standard(StandardScaler {
            feature_names: NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            mean: vec![0.0; 6],
            scale: vec![1.0; 6],
        })
    }

    pub(crate) fn example_draft() -> PatientDraft {
        PatientDraft {
            age: Some(63.0),
            resting_bp: Some(145.0),
            cholesterol: Some(233.0),
            max_heart_rate: Some(150.0),
            st_depression: Some(2.3),
            major_vessels: Some(0.0),
            chest_pain: Some(1),
            resting_ecg: Some(2),
            st_slope: Some(3),
        }
    }

    fn service(p: f64) -> (Arc<MockClassifier>, PredictionService<MockClassifier, FittedScaler>) {
        let classifier = Arc::new(MockClassifier::new(p));
        let svc = PredictionService::new(
            classifier.clone(),
            Arc::new(identity_scaler()),
            FeatureSchema::default(),
        )
        .expect("service");
        (classifier, svc)
    }

    #[test]
    fn test_any_unset_field_is_rejected_without_inference() {
        let (classifier, svc) = service(0.82);
        let clears: [fn(&mut PatientDraft); 9] = [
            |d| d.age = None,
            |d| d.resting_bp = None,
            |d| d.cholesterol = None,
            |d| d.max_heart_rate = None,
            |d| d.st_depression = None,
            |d| d.major_vessels = None,
            |d| d.chest_pain = None,
            |d| d.resting_ecg = None,
            |d| d.st_slope = None,
        ];

        for clear in clears {
            let mut draft = example_draft();
            clear(&mut draft);
            match svc.submit(&draft) {
                Err(CardioError::IncompleteInput(errors)) => assert_eq!(errors.len(), 1),
                other => panic!("expected IncompleteInput, got {other:?}"),
            }
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_form_lists_every_field() {
        let (classifier, svc) = service(0.1);
        match svc.submit(&PatientDraft::default()) {
            Err(CardioError::IncompleteInput(errors)) => assert_eq!(errors.len(), 9),
            other => panic!("expected IncompleteInput, got {other:?}"),
        }
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_end_to_end_example() {
        let (classifier, svc) = service(0.82);
        let assessment = svc.submit(&example_draft()).expect("assessment");

        assert_eq!(assessment.result.label, DiagnosisLabel::DiseaseDetected);
        assert_eq!(assessment.risk_level(), RiskLevel::High);
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);

        // Model order: trestbps, slope_2.0, chol, slope_1.0, thalach, oldpeak,
        // ca, age, slope_3.0, cp_2.0, restecg_2.0, cp_4.0
        let input = classifier.last_input.lock().unwrap().clone();
        assert_eq!(
            input,
            vec![145.0, 0.0, 233.0, 0.0, 150.0, 2.3, 0.0, 63.0, 1.0, 0.0, 1.0, 0.0]
        );
    }

    #[test]
    fn test_repeated_submissions_are_identical() {
        let (_, svc) = service(0.42);
        let a = svc.submit(&example_draft()).expect("assessment");
        let b = svc.submit(&example_draft()).expect("assessment");
        assert_eq!(a.result, b.result);
        assert_eq!(a.risk_level(), RiskLevel::Moderate);
    }

    #[test]
    fn test_contract_mismatch_at_construction() {
        let mut classifier = MockClassifier::new(0.5);
        classifier.names.swap(0, 1);
        let result = PredictionService::new(
            Arc::new(classifier),
            Arc::new(identity_scaler()),
            FeatureSchema::default(),
        );
        assert!(matches!(
            result,
            Err(ArtifactError::FeatureContractMismatch(_))
        ));
    }
}
