//! Artifact loader: reads the fitted classifier and scaler from disk.
//!
//! Expected layout of the artifact directory:
//! - `rf_model.json` (required): random forest, see [`RandomForestClassifier`]
//! - `scaler.json` (required): fitted scaler, see [`FittedScaler`]
//! - `feature_schema.json` (optional): column order override
//! - `manifest.json` (optional): SHA-256 of every artifact file
//! - `artifacts.sig` (optional): Ed25519 signature over `manifest.json`
//!
//! # Security
//!
//! When a manifest is present, every file it lists is hashed and compared
//! before anything is parsed. When a signature is present it must verify
//! against the configured public key. With
//! [`TrustPolicy::require_signature`] set, both must exist.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::adapters::forest::RandomForestClassifier;
use crate::adapters::scaler::FittedScaler;
use crate::domain::FeatureSchema;
use crate::ports::{Classifier, Scaler};

pub const CLASSIFIER_FILE: &str = "rf_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const SCHEMA_FILE: &str = "feature_schema.json";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const SIGNATURE_FILE: &str = "artifacts.sig";

const MANIFEST_VERSION: u32 = 1;

/// Error type for artifact loading. All variants are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("Artifact {name} not found in {location:?}. Ensure {name} is present or set CARDIOPREDICT_ARTIFACT_DIR.")]
    MissingArtifact { name: String, location: PathBuf },

    #[error("Error loading artifact {name}: {reason}")]
    ArtifactLoad { name: String, reason: String },

    #[error("Artifact integrity check failed: {0}")]
    ArtifactIntegrity(String),

    #[error("Feature contract mismatch: {0}")]
    FeatureContractMismatch(String),
}

impl ArtifactError {
    fn load(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::ArtifactLoad {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Content of `manifest.json`: artifact file name to lowercase SHA-256 hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactManifest {
    pub version: u32,
    pub files: BTreeMap<String, String>,
}

impl ArtifactManifest {
    /// Hash the named files in `dir`.
    ///
    /// # Errors
    /// Returns `ArtifactError::MissingArtifact` if a file cannot be read.
    pub fn for_files(dir: &Path, names: &[&str]) -> Result<Self, ArtifactError> {
        let mut files = BTreeMap::new();
        for name in names {
            let bytes = fs::read(dir.join(name)).map_err(|_| ArtifactError::MissingArtifact {
                name: (*name).to_string(),
                location: dir.to_path_buf(),
            })?;
            files.insert((*name).to_string(), sha256_hex(&bytes));
        }
        Ok(Self {
            version: MANIFEST_VERSION,
            files,
        })
    }
}

/// Lowercase hex SHA-256 digest.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// How strictly artifacts are checked before use.
#[derive(Debug, Clone, Default)]
pub struct TrustPolicy {
    /// Refuse to start unless a manifest and a valid signature are present.
    pub require_signature: bool,
    /// Base64 Ed25519 verifying key used for `artifacts.sig`.
    pub verifying_key_b64: Option<String>,
}

impl TrustPolicy {
    fn verifying_key(&self) -> Result<VerifyingKey, ArtifactError> {
        let b64 = self.verifying_key_b64.as_deref().ok_or_else(|| {
            ArtifactError::ArtifactIntegrity(format!(
                "{SIGNATURE_FILE} present but no verifying key configured (set CARDIOPREDICT_ARTIFACT_PUBKEY_B64_FILE)"
            ))
        })?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|_| ArtifactError::ArtifactIntegrity("Invalid public key base64".into()))?;
        let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            ArtifactError::ArtifactIntegrity("Invalid public key length (expected 32 bytes)".into())
        })?;
        VerifyingKey::from_bytes(&key)
            .map_err(|_| ArtifactError::ArtifactIntegrity("Invalid verifying key".into()))
    }
}

/// Everything the prediction pipeline needs, loaded once at startup.
#[derive(Debug, Clone)]
pub struct LoadedArtifacts {
    pub classifier: RandomForestClassifier,
    pub scaler: FittedScaler,
    pub schema: FeatureSchema,
}

/// Loads and checks the artifact directory.
#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    dir: PathBuf,
    policy: TrustPolicy,
}

impl ArtifactLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, policy: TrustPolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    /// Load classifier, scaler and schema.
    ///
    /// # Errors
    /// - `MissingArtifact` if a required file is absent
    /// - `ArtifactIntegrity` if the manifest or signature does not check out
    /// - `ArtifactLoad` if a file is unreadable or malformed
    /// - `FeatureContractMismatch` if the artifacts disagree on columns
    pub fn load(&self) -> Result<LoadedArtifacts, ArtifactError> {
        tracing::info!("Loading artifacts from {:?}", self.dir);

        self.require(CLASSIFIER_FILE)?;
        self.require(SCALER_FILE)?;
        self.verify_integrity()?;

        let classifier = RandomForestClassifier::from_json(&self.read_text(CLASSIFIER_FILE)?)
            .map_err(|e| ArtifactError::load(CLASSIFIER_FILE, e))?;
        let scaler = FittedScaler::from_json(&self.read_text(SCALER_FILE)?)
            .map_err(|e| ArtifactError::load(SCALER_FILE, e))?;

        let schema = if self.dir.join(SCHEMA_FILE).exists() {
            serde_json::from_str(&self.read_text(SCHEMA_FILE)?)
                .map_err(|e| ArtifactError::load(SCHEMA_FILE, e))?
        } else {
            FeatureSchema::default()
        };

        schema
            .check_contract(classifier.feature_names(), scaler.feature_names())
            .map_err(ArtifactError::FeatureContractMismatch)?;

        tracing::info!(
            "Loaded classifier ({} trees) and scaler; feature schema {} v{}",
            classifier.n_trees(),
            schema.name,
            schema.version
        );

        Ok(LoadedArtifacts {
            classifier,
            scaler,
            schema,
        })
    }

    fn require(&self, name: &str) -> Result<PathBuf, ArtifactError> {
        let path = self.dir.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            tracing::error!("Required artifact {name} not found in {:?}", self.dir);
            Err(ArtifactError::MissingArtifact {
                name: name.to_string(),
                location: self.dir.clone(),
            })
        }
    }

    fn read_text(&self, name: &str) -> Result<String, ArtifactError> {
        fs::read_to_string(self.dir.join(name)).map_err(|e| ArtifactError::load(name, e))
    }

    fn verify_integrity(&self) -> Result<(), ArtifactError> {
        let manifest_path = self.dir.join(MANIFEST_FILE);
        let sig_path = self.dir.join(SIGNATURE_FILE);

        if !manifest_path.exists() {
            if self.policy.require_signature {
                return Err(ArtifactError::ArtifactIntegrity(format!(
                    "signed {MANIFEST_FILE} required but not found"
                )));
            }
            tracing::debug!("No {MANIFEST_FILE}; skipping integrity check");
            return Ok(());
        }

        let manifest_bytes = fs::read(&manifest_path).map_err(|e| ArtifactError::load(MANIFEST_FILE, e))?;

        if sig_path.exists() {
            let sig_bytes = fs::read(&sig_path).map_err(|e| ArtifactError::load(SIGNATURE_FILE, e))?;
            let sig: [u8; 64] = sig_bytes.as_slice().try_into().map_err(|_| {
                ArtifactError::ArtifactIntegrity("Invalid signature length (expected 64 bytes)".into())
            })?;
            self.policy
                .verifying_key()?
                .verify(&manifest_bytes, &Signature::from_bytes(&sig))
                .map_err(|_| ArtifactError::ArtifactIntegrity("Invalid artifact signature".into()))?;
            tracing::info!("Artifact manifest signature verified");
        } else if self.policy.require_signature {
            return Err(ArtifactError::ArtifactIntegrity(format!(
                "{SIGNATURE_FILE} required but not found"
            )));
        }

        let manifest: ArtifactManifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| ArtifactError::load(MANIFEST_FILE, e))?;
        if manifest.version != MANIFEST_VERSION {
            return Err(ArtifactError::ArtifactIntegrity(format!(
                "Unsupported manifest version: {}",
                manifest.version
            )));
        }

        let mut bound = vec![CLASSIFIER_FILE, SCALER_FILE];
        if self.dir.join(SCHEMA_FILE).exists() {
            bound.push(SCHEMA_FILE);
        }
        for name in bound {
            if !manifest.files.contains_key(name) {
                return Err(ArtifactError::ArtifactIntegrity(format!(
                    "{MANIFEST_FILE} does not cover {name}"
                )));
            }
        }

        for (rel, expected) in &manifest.files {
            if rel.contains('/') || rel.contains('\\') || rel.contains("..") {
                return Err(ArtifactError::ArtifactIntegrity(format!(
                    "Manifest entry {rel:?} is not a plain file name"
                )));
            }
            let bytes = fs::read(self.dir.join(rel)).map_err(|e| {
                ArtifactError::ArtifactIntegrity(format!(
                    "Manifest references missing/unreadable file {rel}: {e}"
                ))
            })?;
            if !constant_time_eq_str(&sha256_hex(&bytes), &expected.to_ascii_lowercase()) {
                return Err(ArtifactError::ArtifactIntegrity(format!(
                    "File hash mismatch for {rel}"
                )));
            }
        }

        tracing::info!("Artifact hashes verified ({} files)", manifest.files.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::forest::DecisionTree;
    use crate::adapters::scaler::StandardScaler;
    use crate::domain::{MODEL_COLUMNS, NUMERIC_COLUMNS};
    use ed25519_dalek::{Signer, SigningKey};
    use rand::RngCore;
    use tempfile::tempdir;

    fn forest() -> RandomForestClassifier {
        RandomForestClassifier {
            feature_names: MODEL_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            classes: vec![0, 1],
            trees: vec![DecisionTree {
                children_left: vec![1, -1, -1],
                children_right: vec![2, -1, -1],
                feature: vec![0, -2, -2],
                threshold: vec![0.0, -2.0, -2.0],
                value: vec![vec![5.0, 5.0], vec![4.0, 1.0], vec![1.0, 4.0]],
            }],
        }
    }

    fn scaler() -> FittedScaler {
        FittedScaler::Standard(StandardScaler {
            feature_names: NUMERIC_COLUMNS.iter().map(|c| (*c).to_string()).collect(),
            mean: vec![54.0, 131.0, 246.0, 149.0, 1.0, 0.7],
            scale: vec![9.0, 17.5, 51.6, 22.9, 1.16, 0.93],
        })
    }

    fn write_artifacts(dir: &Path) {
        fs::write(dir.join(CLASSIFIER_FILE), serde_json::to_vec(&forest()).unwrap()).unwrap();
        fs::write(dir.join(SCALER_FILE), serde_json::to_vec(&scaler()).unwrap()).unwrap();
    }

    fn signing_key() -> SigningKey {
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        SigningKey::from_bytes(&seed)
    }

    fn sign_dir(dir: &Path, key: &SigningKey) {
        let manifest = ArtifactManifest::for_files(dir, &[CLASSIFIER_FILE, SCALER_FILE])
            .expect("manifest");
        let bytes = serde_json::to_vec(&manifest).expect("serialize manifest");
        fs::write(dir.join(MANIFEST_FILE), &bytes).unwrap();
        fs::write(dir.join(SIGNATURE_FILE), key.sign(&bytes).to_bytes()).unwrap();
    }

    fn policy_for(key: &SigningKey, require_signature: bool) -> TrustPolicy {
        TrustPolicy {
            require_signature,
            verifying_key_b64: Some(
                base64::engine::general_purpose::STANDARD.encode(key.verifying_key().to_bytes()),
            ),
        }
    }

    #[test]
    fn test_load_plain_artifacts() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let loaded = ArtifactLoader::new(temp.path(), TrustPolicy::default())
            .load()
            .expect("Should load");
        assert_eq!(loaded.classifier.n_trees(), 1);
        assert_eq!(loaded.schema, FeatureSchema::default());
    }

    #[test]
    fn test_bundled_demo_artifacts_load() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("artifacts");
        let loaded = ArtifactLoader::new(&dir, TrustPolicy::default())
            .load()
            .expect("Bundled artifacts should load");
        assert_eq!(loaded.schema, FeatureSchema::default());

        let row = vec![0.0; loaded.classifier.feature_names().len()];
        let result = loaded.classifier.predict(&row).expect("Should predict");
        assert!((0.0..=1.0).contains(&result.probability));
    }

    #[test]
    fn test_missing_classifier_is_reported_by_name() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(SCALER_FILE), serde_json::to_vec(&scaler()).unwrap()).unwrap();

        let err = ArtifactLoader::new(temp.path(), TrustPolicy::default())
            .load()
            .expect_err("must fail");
        match err {
            ArtifactError::MissingArtifact { name, location } => {
                assert_eq!(name, CLASSIFIER_FILE);
                assert_eq!(location, temp.path());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_scaler_is_reported_by_name() {
        let temp = tempdir().expect("tempdir");
        fs::write(temp.path().join(CLASSIFIER_FILE), serde_json::to_vec(&forest()).unwrap())
            .unwrap();

        let err = ArtifactLoader::new(temp.path(), TrustPolicy::default())
            .load()
            .expect_err("must fail");
        assert!(matches!(err, ArtifactError::MissingArtifact { ref name, .. } if name == SCALER_FILE));
        assert!(err.to_string().contains(SCALER_FILE));
    }

    #[test]
    fn test_corrupt_artifact_is_load_error() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        fs::write(temp.path().join(SCALER_FILE), b"\x80\x04pickle").unwrap();

        let err = ArtifactLoader::new(temp.path(), TrustPolicy::default())
            .load()
            .expect_err("must fail");
        assert!(matches!(err, ArtifactError::ArtifactLoad { ref name, .. } if name == SCALER_FILE));
    }

    #[test]
    fn test_schema_override_must_match_classifier() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let mut schema = FeatureSchema::default();
        schema.columns.swap(0, 1);
        schema.version = 2;
        fs::write(temp.path().join(SCHEMA_FILE), serde_json::to_vec(&schema).unwrap()).unwrap();

        let err = ArtifactLoader::new(temp.path(), TrustPolicy::default())
            .load()
            .expect_err("must fail");
        assert!(matches!(err, ArtifactError::FeatureContractMismatch(_)));
    }

    #[test]
    fn test_signed_artifacts_verify() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        let key = signing_key();
        sign_dir(temp.path(), &key);

        ArtifactLoader::new(temp.path(), policy_for(&key, true))
            .load()
            .expect("Should load signed artifacts");
    }

    #[test]
    fn test_tampered_artifact_fails_hash_check() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        let key = signing_key();
        sign_dir(temp.path(), &key);

        let mut tampered = forest();
        tampered.trees[0].value[2] = vec![0.0, 5.0];
        fs::write(
            temp.path().join(CLASSIFIER_FILE),
            serde_json::to_vec(&tampered).unwrap(),
        )
        .unwrap();

        let err = ArtifactLoader::new(temp.path(), policy_for(&key, false))
            .load()
            .expect_err("must fail");
        assert!(err.to_string().contains("hash mismatch"));
    }

    #[test]
    fn test_signature_from_other_key_rejected() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        sign_dir(temp.path(), &signing_key());

        let err = ArtifactLoader::new(temp.path(), policy_for(&signing_key(), false))
            .load()
            .expect_err("must fail");
        assert!(err.to_string().contains("Invalid artifact signature"));
    }

    #[test]
    fn test_required_signature_missing() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());

        let err = ArtifactLoader::new(temp.path(), policy_for(&signing_key(), true))
            .load()
            .expect_err("must fail");
        assert!(matches!(err, ArtifactError::ArtifactIntegrity(_)));
    }

    #[test]
    fn test_manifest_must_cover_schema_override() {
        let temp = tempdir().expect("tempdir");
        write_artifacts(temp.path());
        let key = signing_key();
        sign_dir(temp.path(), &key);
        fs::write(
            temp.path().join(SCHEMA_FILE),
            serde_json::to_vec(&FeatureSchema::default()).unwrap(),
        )
        .unwrap();

        let err = ArtifactLoader::new(temp.path(), policy_for(&key, false))
            .load()
            .expect_err("must fail");
        assert!(err.to_string().contains(SCHEMA_FILE));
    }
}
