//! Request-scoped upload staging.
//!
//! OCR engines read images from disk, so each upload is written to a uniquely
//! named file in the upload directory. The file lives exactly as long as its
//! [`ScopedUpload`]: [`ScopedUpload::close`] deletes it on the normal path and
//! `Drop` deletes it on error and panic paths. A failed deletion is logged,
//! never returned.

use crate::{PattaError, Result};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const UPLOAD_PREFIX: &str = "patta-";
const MAX_EXTENSION_LEN: usize = 8;

/// An uploaded file staged on disk for the duration of one request.
#[derive(Debug)]
pub struct ScopedUpload {
    file: Option<NamedTempFile>,
    path: PathBuf,
    original_name: Option<String>,
    size: usize,
}

impl ScopedUpload {
    /// Write `bytes` to a fresh file in `dir`, creating `dir` if needed.
    ///
    /// The file name is random; only the extension is derived from
    /// `file_name` (or from `content_type` when the name has none), so two
    /// uploads with the same name never share a path.
    ///
    /// # Errors
    ///
    /// Returns `PattaError::Upload` if the directory or file cannot be created
    /// or written.
    pub async fn create(
        dir: &Path,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<Self> {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            PattaError::upload_with_source(format!("cannot create upload directory {}", dir.display()), e)
        })?;

        let suffix = upload_suffix(file_name, content_type);
        let file = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .suffix(&suffix)
            .tempfile_in(dir)
            .map_err(|e| PattaError::upload_with_source(format!("cannot create upload file in {}", dir.display()), e))?;
        let path = file.path().to_path_buf();

        // Dropping `file` on the error path removes the partial upload.
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PattaError::upload_with_source(format!("cannot write upload to {}", path.display()), e))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "Upload staged");

        Ok(Self {
            file: Some(file),
            path,
            original_name: file_name.map(str::to_string),
            size: bytes.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filename supplied by the client, if any.
    pub fn original_name(&self) -> Option<&str> {
        self.original_name.as_deref()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Delete the staged file now.
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(file) = self.file.take() {
            match file.close() {
                Ok(()) => tracing::debug!(path = %self.path.display(), "Upload removed"),
                Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove upload"),
            }
        }
    }
}

impl Drop for ScopedUpload {
    fn drop(&mut self) {
        self.remove();
    }
}

/// `.ext` for the staged file: from the client filename, else from the MIME type.
fn upload_suffix(file_name: Option<&str>, content_type: Option<&str>) -> String {
    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let from_mime = || {
        content_type
            .and_then(mime_guess::get_mime_extensions_str)
            .and_then(|exts| exts.first())
            .map(|ext| ext.to_string())
    };

    from_name
        .filter(|ext| is_safe_extension(ext))
        .or_else(from_mime)
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= MAX_EXTENSION_LEN && ext.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_writes_bytes() {
        let dir = tempdir().unwrap();
        let upload = ScopedUpload::create(dir.path(), Some("patta.png"), Some("image/png"), b"image-bytes")
            .await
            .unwrap();

        assert!(upload.path().exists());
        assert!(upload.path().starts_with(dir.path()));
        assert_eq!(std::fs::read(upload.path()).unwrap(), b"image-bytes");
        assert_eq!(upload.original_name(), Some("patta.png"));
        assert_eq!(upload.size(), 11);
        assert_eq!(upload.path().extension().and_then(|e| e.to_str()), Some("png"));
    }

    #[tokio::test]
    async fn test_same_filename_gets_unique_paths() {
        let dir = tempdir().unwrap();
        let first = ScopedUpload::create(dir.path(), Some("scan.jpg"), None, b"one").await.unwrap();
        let second = ScopedUpload::create(dir.path(), Some("scan.jpg"), None, b"two").await.unwrap();

        assert_ne!(first.path(), second.path());
        assert_eq!(std::fs::read(first.path()).unwrap(), b"one");
        assert_eq!(std::fs::read(second.path()).unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_close_removes_file() {
        let dir = tempdir().unwrap();
        let upload = ScopedUpload::create(dir.path(), Some("scan.jpg"), None, b"data").await.unwrap();
        let path = upload.path().to_path_buf();

        upload.close();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempdir().unwrap();
        let path = {
            let upload = ScopedUpload::create(dir.path(), None, None, b"data").await.unwrap();
            upload.path().to_path_buf()
        };
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_close_tolerates_already_deleted_file() {
        let dir = tempdir().unwrap();
        let upload = ScopedUpload::create(dir.path(), Some("a.png"), None, b"data").await.unwrap();
        std::fs::remove_file(upload.path()).unwrap();
        upload.close();
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("uploads").join("today");
        let upload = ScopedUpload::create(&nested, Some("a.png"), None, b"data").await.unwrap();
        assert!(nested.is_dir());
        assert!(upload.path().starts_with(&nested));
    }

    #[tokio::test]
    async fn test_unusable_directory_is_upload_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = ScopedUpload::create(&blocker.join("uploads"), Some("a.png"), None, b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, PattaError::Upload { .. }));
    }

    #[test]
    fn test_upload_suffix() {
        assert_eq!(upload_suffix(Some("Scan.PNG"), None), ".png");
        assert_eq!(upload_suffix(Some("archive.tar.gz"), None), ".gz");
        assert_eq!(upload_suffix(Some("noext"), Some("image/png")), ".png");
        assert!(upload_suffix(None, Some("image/jpeg")).starts_with(".j"));
        assert_eq!(upload_suffix(Some("../../etc/passwd"), None), "");
        assert_eq!(upload_suffix(Some("evil.p$p"), Some("image/png")), ".png");
        assert_eq!(upload_suffix(None, None), "");
    }
}
