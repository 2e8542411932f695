//! Tesseract command-line backend.
//!
//! Runs `tesseract <image> stdout -l <lang>` per request and turns each
//! non-empty output line into a [`RecognizedSpan`].

use crate::core::config::OcrConfig;
use crate::ocr::types::{OcrBackendType, RecognizedSpan};
use crate::plugins::{OcrBackend, Plugin};
use crate::{PattaError, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// OCR backend wrapping the `tesseract` CLI tool.
pub struct TesseractCliBackend {
    command: String,
    language: String,
    timeout: Duration,
    detected_version: OnceCell<String>,
}

impl TesseractCliBackend {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            language: config.language.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            detected_version: OnceCell::new(),
        }
    }
}

impl Plugin for TesseractCliBackend {
    fn name(&self) -> &str {
        "tesseract-cli"
    }

    fn version(&self) -> String {
        self.detected_version
            .get()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn initialize(&self) -> Result<()> {
        let output = std::process::Command::new(&self.command)
            .arg("--version")
            .output()
            .map_err(|e| PattaError::MissingDependency(format!("cannot run '{}': {}", self.command, e)))?;

        if !output.status.success() {
            return Err(PattaError::MissingDependency(format!(
                "'{} --version' exited with {}",
                self.command, output.status
            )));
        }

        // Older releases print the banner on stderr.
        let banner = if output.stdout.is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            String::from_utf8_lossy(&output.stdout).into_owned()
        };
        let version = parse_version_banner(&banner).unwrap_or_else(|| "unknown".to_string());

        tracing::info!(command = %self.command, version = %version, "Tesseract OCR backend ready");
        let _ = self.detected_version.set(version);
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl OcrBackend for TesseractCliBackend {
    #[tracing::instrument(level = "debug", skip(self), fields(lang = %self.language))]
    async fn recognize_file(&self, path: &Path) -> Result<Vec<RecognizedSpan>> {
        let child = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| PattaError::ocr(format!("tesseract timed out after {}s", self.timeout.as_secs())))?
            .map_err(|e| PattaError::ocr_with_source(format!("cannot run '{}'", self.command), e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PattaError::ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let spans = parse_tesseract_output(&stdout);
        tracing::debug!(spans = spans.len(), "tesseract finished");
        Ok(spans)
    }

    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Tesseract
    }
}

/// One span per non-empty line of plain-text tesseract output.
pub(crate) fn parse_tesseract_output(stdout: &str) -> Vec<RecognizedSpan> {
    stdout
        .lines()
        .map(|line| line.trim_matches(|c: char| c.is_whitespace() || c == '\u{000C}'))
        .filter(|line| !line.is_empty())
        .map(RecognizedSpan::new)
        .collect()
}

fn parse_version_banner(banner: &str) -> Option<String> {
    let first = banner.lines().next()?.trim();
    first
        .strip_prefix("tesseract")
        .map(|rest| rest.trim().trim_start_matches('v').to_string())
        .filter(|v| !v.is_empty())
}
