//! Runtime configuration read from `CARDIOPREDICT_*` environment variables.

use std::path::PathBuf;

use crate::adapters::artifacts::TrustPolicy;

pub const ARTIFACT_DIR_ENV: &str = "CARDIOPREDICT_ARTIFACT_DIR";
pub const EXPORT_DIR_ENV: &str = "CARDIOPREDICT_EXPORT_DIR";
pub const REQUIRE_SIGNED_ENV: &str = "CARDIOPREDICT_REQUIRE_SIGNED_ARTIFACTS";
pub const PUBKEY_ENV: &str = "CARDIOPREDICT_ARTIFACT_PUBKEY_B64";
pub const PUBKEY_FILE_ENV: &str = "CARDIOPREDICT_ARTIFACT_PUBKEY_B64_FILE";
pub const LOG_MODE_ENV: &str = "CARDIOPREDICT_LOG_MODE";
pub const LOG_FILE_ENV: &str = "CARDIOPREDICT_LOG_FILE";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` given whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artifact_dir: PathBuf,
    pub export_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub trust: TrustPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("artifacts"),
            export_dir: PathBuf::from("."),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from("cardiopredict.log"),
            trust: TrustPolicy::default(),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    /// Returns error if the public key file is set but cannot be read.
    pub fn from_env() -> std::io::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns error if the public key file is set but cannot be read.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> std::io::Result<Self> {
        let defaults = Self::default();

        // The key file wins over an inline key.
        let verifying_key_b64 = match lookup(PUBKEY_FILE_ENV) {
            Some(path) => Some(std::fs::read_to_string(path.trim())?.trim().to_string()),
            None => lookup(PUBKEY_ENV).map(|v| v.trim().to_string()),
        }
        .filter(|v| !v.is_empty());

        Ok(Self {
            artifact_dir: lookup(ARTIFACT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.artifact_dir),
            export_dir: lookup(EXPORT_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            log_mode: lookup(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or_default(),
            log_file: lookup(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            trust: TrustPolicy {
                require_signature: lookup(REQUIRE_SIGNED_ENV).is_some_and(|v| parse_bool(&v)),
                verifying_key_b64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[])).expect("config");
        assert_eq!(config.artifact_dir, PathBuf::from("artifacts"));
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.log_mode, LogMode::Auto);
        assert!(!config.trust.require_signature);
        assert!(config.trust.verifying_key_b64.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ARTIFACT_DIR_ENV, "/opt/models"),
            (EXPORT_DIR_ENV, "/tmp/out"),
            (LOG_MODE_ENV, "STDOUT"),
            (REQUIRE_SIGNED_ENV, "yes"),
            (PUBKEY_ENV, " abc= "),
        ]))
        .expect("config");
        assert_eq!(config.artifact_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert!(config.trust.require_signature);
        assert_eq!(config.trust.verifying_key_b64.as_deref(), Some("abc="));
    }

    #[test]
    fn test_pubkey_file_takes_precedence() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("pub.b64");
        std::fs::write(&path, "fromfile=\n").unwrap();

        let config = AppConfig::from_lookup(lookup_from(&[
            (PUBKEY_FILE_ENV, path.to_str().unwrap()),
            (PUBKEY_ENV, "inline="),
        ]))
        .expect("config");
        assert_eq!(config.trust.verifying_key_b64.as_deref(), Some("fromfile="));

        let missing = temp.path().join("absent");
        assert!(AppConfig::from_lookup(lookup_from(&[(
            PUBKEY_FILE_ENV,
            missing.to_str().unwrap()
        )]))
        .is_err());
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
        assert_eq!(LogMode::parse("bogus"), LogMode::Auto);
    }
}
