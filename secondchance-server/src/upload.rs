//! Image uploads for new listings
//!
//! Files are written to a single public directory under the client's
//! original filename. Same name, same file: a later upload overwrites an
//! earlier one.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

/// URL prefix the upload directory is served under
pub const PUBLIC_PREFIX: &str = "/images";

/// Default upload directory, relative to the working directory
pub const DEFAULT_UPLOAD_DIR: &str = "public/images";

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("uploaded file has no usable filename")]
    MissingFileName,

    #[error("failed to write upload: {0}")]
    Io(#[from] std::io::Error),
}

/// The directory uploads land in
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `bytes` under the original filename and return its public path.
    ///
    /// Only the final path component of `original_name` is used.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
        let name = Path::new(original_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or(UploadError::MissingFileName)?;

        fs::create_dir_all(&self.root).await?;
        fs::write(self.root.join(name), bytes).await?;

        tracing::info!(file = name, bytes = bytes.len(), "stored upload");
        Ok(format!("{}/{}", PUBLIC_PREFIX, name))
    }
}

impl Default for UploadDir {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn stores_bytes_under_original_name() {
        let tmp = TempDir::new().unwrap();
        let uploads = UploadDir::new(tmp.path().join("images"));

        let path = uploads.store("chair.png", b"\x89PNG data").await.unwrap();

        assert_eq!(path, "/images/chair.png");
        let written = std::fs::read(tmp.path().join("images/chair.png")).unwrap();
        assert_eq!(written, b"\x89PNG data");
    }

    #[tokio::test]
    async fn same_name_overwrites() {
        let tmp = TempDir::new().unwrap();
        let uploads = UploadDir::new(tmp.path());

        uploads.store("lamp.jpg", b"first").await.unwrap();
        uploads.store("lamp.jpg", b"second").await.unwrap();

        assert_eq!(std::fs::read(tmp.path().join("lamp.jpg")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn directory_components_are_dropped() {
        let tmp = TempDir::new().unwrap();
        let uploads = UploadDir::new(tmp.path().join("images"));

        let path = uploads.store("../../escape.txt", b"x").await.unwrap();

        assert_eq!(path, "/images/escape.txt");
        assert!(tmp.path().join("images/escape.txt").exists());
        assert!(!tmp.path().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let uploads = UploadDir::new(tmp.path());

        assert!(matches!(
            uploads.store("", b"x").await,
            Err(UploadError::MissingFileName)
        ));
        assert!(matches!(
            uploads.store("..", b"x").await,
            Err(UploadError::MissingFileName)
        ));
    }
}
