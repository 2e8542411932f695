//! Configuration loading and management.
//!
//! [`PattaConfig`] can be loaded from TOML, YAML or JSON, discovered as
//! `patta.toml` in the current or parent directories, or built in code.
//! Environment variables override file values for the settings that usually
//! differ between deployments (model endpoints, API token, upload directory).

use crate::{PattaError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default confidence threshold for NER entities.
pub const DEFAULT_MIN_SCORE: f64 = 0.85;

/// Default token-classification model endpoint.
pub const DEFAULT_NER_ENDPOINT: &str = "https://api-inference.huggingface.co/models/Davlan/xlm-roberta-large-ner-hrl";

/// Name of the file searched for by [`PattaConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "patta.toml";

/// Main service configuration.
///
/// # Example
///
/// ```rust
/// use patta_ocr::core::config::PattaConfig;
///
/// let config = PattaConfig::default();
/// assert_eq!(config.ner.min_score, 0.85);
/// assert!(!config.pipeline.partial_results);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PattaConfig {
    /// OCR engine settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// NER model settings
    #[serde(default)]
    pub ner: NerConfig,

    /// Upload staging settings
    #[serde(default)]
    pub upload: UploadConfig,

    /// Request pipeline behaviour
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Which OCR engine to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackendKind {
    /// Local `tesseract` binary
    #[default]
    Tesseract,
    /// Remote OCR model server
    Http,
}

/// OCR configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// OCR backend: tesseract, http
    #[serde(default)]
    pub backend: OcrBackendKind,

    /// Language code passed to the engine (e.g. "eng")
    #[serde(default = "default_eng")]
    pub language: String,

    /// Tesseract executable
    #[serde(default = "default_tesseract_cmd")]
    pub tesseract_cmd: String,

    /// OCR model server URL (required for the http backend)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Per-image timeout in seconds
    #[serde(default = "default_ocr_timeout")]
    pub timeout_secs: u64,
}

/// NER configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NerConfig {
    /// Token-classification endpoint URL
    #[serde(default = "default_ner_endpoint")]
    pub endpoint: String,

    /// Bearer token for the endpoint
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// Minimum entity confidence kept by the merger
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Aggregation strategy requested from the model server
    #[serde(default = "default_aggregation")]
    pub aggregation_strategy: String,

    /// Request timeout in seconds
    #[serde(default = "default_ner_timeout")]
    pub timeout_secs: u64,
}

/// Upload staging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Directory for request-scoped upload files (None = `<tmp>/patta-uploads`)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Pipeline behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Return OCR text and Patta fields with a warning when NER fails
    #[serde(default)]
    pub partial_results: bool,
}

fn default_eng() -> String {
    "eng".to_string()
}
fn default_tesseract_cmd() -> String {
    "tesseract".to_string()
}
fn default_ocr_timeout() -> u64 {
    120
}
fn default_ner_endpoint() -> String {
    DEFAULT_NER_ENDPOINT.to_string()
}
fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}
fn default_aggregation() -> String {
    "simple".to_string()
}
fn default_ner_timeout() -> u64 {
    60
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::default(),
            language: default_eng(),
            tesseract_cmd: default_tesseract_cmd(),
            endpoint: None,
            timeout_secs: default_ocr_timeout(),
        }
    }
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ner_endpoint(),
            api_token: None,
            min_score: default_min_score(),
            aggregation_strategy: default_aggregation(),
            timeout_secs: default_ner_timeout(),
        }
    }
}

impl UploadConfig {
    /// Directory uploads are staged in.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("patta-uploads"))
    }
}

impl PattaConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `PattaError::Validation` if file doesn't exist or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        toml::from_str(&content)
            .map_err(|e| PattaError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_yaml_ng::from_str(&content)
            .map_err(|e| PattaError::validation(format!("Invalid YAML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = read_config(path.as_ref())?;

        serde_json::from_str(&content)
            .map_err(|e| PattaError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration, picking the format from the file extension.
    ///
    /// `.yaml`/`.yml` and `.json` are recognized; anything else is read as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Discover `patta.toml` in the current directory or its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(PattaError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("Found config file at {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }

    /// Resolve the effective configuration for a process.
    ///
    /// Uses `path` when given, otherwise discovery, otherwise defaults; then
    /// applies environment overrides and validates.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                tracing::info!("Loading config from {}", path.display());
                Self::from_file(path)?
            }
            None => match Self::discover()? {
                Some(config) => {
                    tracing::info!("Loaded config from discovered {}", CONFIG_FILE_NAME);
                    config
                }
                None => {
                    tracing::info!("No config file found, using default configuration");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `PATTA_*` environment variable overrides.
    ///
    /// - `PATTA_NER_ENDPOINT`
    /// - `PATTA_NER_API_TOKEN` (falls back to `HF_API_TOKEN`)
    /// - `PATTA_OCR_ENDPOINT`
    /// - `PATTA_UPLOAD_DIR`
    pub fn apply_env_overrides(&mut self) {
        if let Some(endpoint) = non_empty_env("PATTA_NER_ENDPOINT") {
            tracing::info!("NER endpoint overridden from environment");
            self.ner.endpoint = endpoint;
        }

        if let Some(token) = non_empty_env("PATTA_NER_API_TOKEN").or_else(|| non_empty_env("HF_API_TOKEN")) {
            self.ner.api_token = Some(token);
        }

        if let Some(endpoint) = non_empty_env("PATTA_OCR_ENDPOINT") {
            tracing::info!("OCR endpoint overridden from environment");
            self.ocr.endpoint = Some(endpoint);
        }

        if let Some(dir) = non_empty_env("PATTA_UPLOAD_DIR") {
            self.upload.dir = Some(PathBuf::from(dir));
        }
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns `PattaError::Validation` if `min_score` is outside `[0, 1]`, the
    /// http OCR backend has no endpoint, the NER endpoint is empty, or a timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ner.min_score) {
            return Err(PattaError::validation(format!(
                "ner.min_score must be between 0 and 1, got {}",
                self.ner.min_score
            )));
        }

        if self.ner.endpoint.trim().is_empty() {
            return Err(PattaError::validation("ner.endpoint must not be empty"));
        }

        if self.ocr.backend == OcrBackendKind::Http && self.ocr.endpoint.as_deref().is_none_or(|e| e.trim().is_empty())
        {
            return Err(PattaError::validation(
                "ocr.endpoint is required when ocr.backend = \"http\"",
            ));
        }

        if self.ocr.timeout_secs == 0 || self.ner.timeout_secs == 0 {
            return Err(PattaError::validation("timeouts must be greater than zero"));
        }

        Ok(())
    }
}

fn read_config(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| PattaError::validation(format!("Failed to read config file {}: {}", path.display(), e)))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = PattaConfig::default();
        assert_eq!(config.ocr.backend, OcrBackendKind::Tesseract);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ner.endpoint, DEFAULT_NER_ENDPOINT);
        assert_eq!(config.ner.min_score, DEFAULT_MIN_SCORE);
        assert!(config.upload.dir.is_none());
        assert!(!config.pipeline.partial_results);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("patta.toml");

        fs::write(
            &config_path,
            r#"
[ocr]
backend = "http"
endpoint = "http://localhost:9000/ocr"

[ner]
min_score = 0.9

[pipeline]
partial_results = true
        "#,
        )
        .unwrap();

        let config = PattaConfig::from_toml_file(&config_path).unwrap();
        assert_eq!(config.ocr.backend, OcrBackendKind::Http);
        assert_eq!(config.ocr.endpoint.as_deref(), Some("http://localhost:9000/ocr"));
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ner.min_score, 0.9);
        assert_eq!(config.ner.endpoint, DEFAULT_NER_ENDPOINT);
        assert!(config.pipeline.partial_results);
    }

    #[test]
    fn test_from_file_dispatches_on_extension() {
        let dir = tempdir().unwrap();

        let yaml_path = dir.path().join("patta.yaml");
        fs::write(&yaml_path, "ner:\n  min_score: 0.7\n").unwrap();
        assert_eq!(PattaConfig::from_file(&yaml_path).unwrap().ner.min_score, 0.7);

        let json_path = dir.path().join("patta.json");
        fs::write(&json_path, r#"{"ocr": {"language": "hin"}}"#).unwrap();
        assert_eq!(PattaConfig::from_file(&json_path).unwrap().ocr.language, "hin");

        let toml_path = dir.path().join("patta.conf");
        fs::write(&toml_path, "[upload]\ndir = \"/var/tmp/patta\"\n").unwrap();
        assert_eq!(
            PattaConfig::from_file(&toml_path).unwrap().upload.dir,
            Some(PathBuf::from("/var/tmp/patta"))
        );
    }

    #[test]
    fn test_invalid_toml_is_validation_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("patta.toml");
        fs::write(&config_path, "[ocr\nbackend = ").unwrap();

        let err = PattaConfig::from_toml_file(&config_path).unwrap_err();
        assert!(matches!(err, PattaError::Validation { .. }));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_missing_file_is_validation_error() {
        let err = PattaConfig::from_toml_file("/nonexistent/patta.toml").unwrap_err();
        assert!(matches!(err, PattaError::Validation { .. }));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("patta.toml");
        fs::write(&config_path, "[ocr]\nbackend = \"paddle\"\n").unwrap();
        assert!(PattaConfig::from_toml_file(&config_path).is_err());
    }

    #[test]
    fn test_validate_min_score_range() {
        let mut config = PattaConfig::default();
        config.ner.min_score = 1.5;
        assert!(config.validate().is_err());
        config.ner.min_score = -0.1;
        assert!(config.validate().is_err());
        config.ner.min_score = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_http_ocr_requires_endpoint() {
        let mut config = PattaConfig::default();
        config.ocr.backend = OcrBackendKind::Http;
        assert!(config.validate().is_err());
        config.ocr.endpoint = Some("http://ocr.local/readtext".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_api_token_not_serialized() {
        let mut config = PattaConfig::default();
        config.ner.api_token = Some("secret".to_string());
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_resolved_upload_dir() {
        let config = UploadConfig::default();
        assert!(config.resolved_dir().ends_with("patta-uploads"));

        let config = UploadConfig {
            dir: Some(PathBuf::from("/srv/uploads")),
        };
        assert_eq!(config.resolved_dir(), PathBuf::from("/srv/uploads"));
    }

    #[test]
    #[serial_test::serial]
    fn test_env_overrides() {
        unsafe {
            std::env::set_var("PATTA_NER_ENDPOINT", "http://ner.local/predict");
            std::env::set_var("PATTA_NER_API_TOKEN", "token-123");
            std::env::set_var("PATTA_OCR_ENDPOINT", "http://ocr.local/readtext");
            std::env::set_var("PATTA_UPLOAD_DIR", "/tmp/patta-test-uploads");
        }

        let mut config = PattaConfig::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var("PATTA_NER_ENDPOINT");
            std::env::remove_var("PATTA_NER_API_TOKEN");
            std::env::remove_var("PATTA_OCR_ENDPOINT");
            std::env::remove_var("PATTA_UPLOAD_DIR");
        }

        assert_eq!(config.ner.endpoint, "http://ner.local/predict");
        assert_eq!(config.ner.api_token.as_deref(), Some("token-123"));
        assert_eq!(config.ocr.endpoint.as_deref(), Some("http://ocr.local/readtext"));
        assert_eq!(config.upload.dir, Some(PathBuf::from("/tmp/patta-test-uploads")));
    }

    #[test]
    #[serial_test::serial]
    fn test_empty_env_values_ignored() {
        unsafe {
            std::env::set_var("PATTA_NER_ENDPOINT", "  ");
        }

        let mut config = PattaConfig::default();
        config.apply_env_overrides();

        unsafe {
            std::env::remove_var("PATTA_NER_ENDPOINT");
        }

        assert_eq!(config.ner.endpoint, DEFAULT_NER_ENDPOINT);
    }

    #[test]
    #[serial_test::serial]
    fn test_discover_patta_toml() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("patta.toml");
        fs::write(&config_path, "[ner]\nmin_score = 0.5\n").unwrap();

        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&nested).unwrap();

        let result = std::panic::catch_unwind(|| {
            let config = PattaConfig::discover().unwrap();
            assert!(config.is_some());
            assert_eq!(config.unwrap().ner.min_score, 0.5);
        });

        std::env::set_current_dir(&original_dir).unwrap();

        if let Err(e) = result {
            std::panic::resume_unwind(e);
        }
    }
}
