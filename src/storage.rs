//! Filesystem upload storage.
//!
//! Uploads are written under a caller-provided directory with generated
//! keys, so concurrent requests can never clobber each other regardless of
//! the claimed filename. The original name is retained for display only.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "flv", "wmv", "webm"];

/// Filesystem manager for uploaded videos and generated frames.
#[derive(Debug, Clone)]
pub struct UploadStore {
    base_dir: PathBuf,
    max_bytes: u64,
}

/// An upload mid-stream. Dropped without [`finish`](PendingUpload::finish),
/// the partial file is removed.
pub struct PendingUpload {
    file: Option<tokio::fs::File>,
    path: PathBuf,
    key: String,
    original_name: String,
    written: u64,
    max_bytes: u64,
}

/// A fully written upload.
///
/// Owns the file on disk: dropping the value removes it, so the file is
/// cleaned up exactly once on every exit path. Frames generated next to it
/// are not covered — they are retained for serving.
#[derive(Debug)]
pub struct StoredUpload {
    /// Generated storage key (uuid + original extension).
    pub key: String,
    /// Caller-supplied name, for display only.
    pub original_name: String,
    path: Option<PathBuf>,
}

impl UploadStore {
    /// Create a store rooted at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: PathBuf, max_bytes: u64) -> Result<Self> {
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            max_bytes,
        })
    }

    /// Directory files are stored in.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Validate a claimed filename against the extension allow-list,
    /// returning the lowercased extension.
    pub fn validate_extension(claimed_name: &str) -> Result<String> {
        let ext = Path::new(claimed_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| Error::Validation("filename has no extension".into()))?;

        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(Error::Validation(format!(
                "file type .{ext} is not supported (allowed: {})",
                ALLOWED_EXTENSIONS.join(", ")
            )));
        }

        Ok(ext)
    }

    /// Begin streaming an upload. Rejects disallowed extensions before any
    /// bytes are written.
    pub async fn begin(&self, claimed_name: &str) -> Result<PendingUpload> {
        let ext = Self::validate_extension(claimed_name)?;

        let key = format!("{}.{ext}", Uuid::new_v4());
        let path = self.base_dir.join(&key);
        let file = tokio::fs::File::create(&path).await?;

        Ok(PendingUpload {
            file: Some(file),
            path,
            key,
            original_name: claimed_name.to_string(),
            written: 0,
            max_bytes: self.max_bytes,
        })
    }

    /// Resolve a stored filename for retrieval.
    ///
    /// The name is sanitized: anything containing a path separator or a
    /// parent-directory component is rejected, so retrieval can never
    /// escape the store directory.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty()
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(Error::Validation("invalid file name".into()));
        }

        let path = self.base_dir.join(name);
        if !path.is_file() {
            return Err(Error::not_found("file", name));
        }

        Ok(path)
    }
}

impl PendingUpload {
    /// Append a chunk, enforcing the size cap incrementally.
    ///
    /// On overflow the partial file is removed immediately and a validation
    /// error is returned — the whole upload is never buffered or retained.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        self.written += chunk.len() as u64;
        if self.written > self.max_bytes {
            self.discard().await;
            return Err(Error::Validation(format!(
                "upload exceeds the {} byte limit",
                self.max_bytes
            )));
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| Error::Internal("write after discard".into()))?;
        file.write_all(chunk).await?;
        Ok(())
    }

    /// Finalize the upload, flushing to disk.
    pub async fn finish(mut self) -> Result<StoredUpload> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
        }

        Ok(StoredUpload {
            key: self.key.clone(),
            original_name: self.original_name.clone(),
            path: Some(std::mem::take(&mut self.path)),
        })
    }

    async fn discard(&mut self) {
        self.file = None;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove partial upload");
            }
        }
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        // A live file handle here means the upload was neither finished nor
        // discarded: remove the partial file.
        if self.file.take().is_some() {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

impl StoredUpload {
    /// Path of the stored file.
    pub fn path(&self) -> &Path {
        self.path.as_deref().expect("stored upload already deleted")
    }

    /// File stem of the key, used to name derived artifacts.
    pub fn key_stem(&self) -> &str {
        self.key.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(&self.key)
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "failed to remove stored upload");
                }
            }
        }
    }
}
