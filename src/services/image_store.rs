//! File-system storage for case pictures.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Flat directory of image files addressed by bare file name.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the image directory if it does not exist yet.
    pub async fn ensure_root(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| AppError::Storage {
                operation: format!("create image directory {}", self.root.display()),
                source,
            })
    }

    /// Reject names that could escape the image directory.
    pub fn validate_name(name: &str) -> AppResult<()> {
        let invalid = name.is_empty()
            || name.starts_with('.')
            || name.contains("..")
            || name.contains(['/', '\\', '\0']);
        if invalid {
            return Err(AppError::bad_request("Invalid image name!"));
        }
        Ok(())
    }

    /// Reduce a client-supplied upload name to its final path component.
    pub fn upload_file_name(original: &str) -> AppResult<String> {
        let name = original
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default()
            .trim();
        Self::validate_name(name)?;
        Ok(name.to_string())
    }

    /// Write (or overwrite) `name` with `bytes`.
    pub async fn write(&self, name: &str, bytes: &[u8]) -> AppResult<()> {
        Self::validate_name(name)?;
        tokio::fs::write(self.root.join(name), bytes)
            .await
            .map_err(|source| AppError::Storage {
                operation: format!("write image {}", name),
                source,
            })
    }

    /// Read the whole file. Any read failure is reported as a missing image.
    pub async fn read(&self, name: &str) -> AppResult<Vec<u8>> {
        Self::validate_name(name)?;
        match tokio::fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                if e.kind() != ErrorKind::NotFound {
                    tracing::warn!(image = %name, error = %e, "Failed to read image");
                }
                Err(AppError::ImageNotFound {
                    name: name.to_string(),
                })
            }
        }
    }

    /// Content type guessed from the extension; JPEG when unknown.
    pub fn content_type(name: &str) -> &'static str {
        let extension = Path::new(name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("svg") => "image/svg+xml",
            _ => "image/jpeg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_name() {
        assert!(ImageStore::validate_name("3poza.jpg").is_ok());
        for bad in ["", ".env", "../etc/passwd", "a/b.jpg", "a\\b.jpg", "a..b", "nul\0.jpg"] {
            assert!(ImageStore::validate_name(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_upload_file_name_keeps_last_component() {
        assert_eq!(ImageStore::upload_file_name("poza.jpg").unwrap(), "poza.jpg");
        assert_eq!(ImageStore::upload_file_name("C:\\poze\\a.png").unwrap(), "a.png");
        assert_eq!(ImageStore::upload_file_name("../../b.gif").unwrap(), "b.gif");
        assert!(ImageStore::upload_file_name("dir/").is_err());
    }

    #[test]
    fn test_content_type() {
        assert_eq!(ImageStore::content_type("1a.PNG"), "image/png");
        assert_eq!(ImageStore::content_type("1a.jpg"), "image/jpeg");
        assert_eq!(ImageStore::content_type("noext"), "image/jpeg");
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new(dir.path().join("cases"));
        store.ensure_root().await.unwrap();

        store.write("1poza.jpg", b"jpeg-bytes").await.unwrap();
        assert_eq!(store.read("1poza.jpg").await.unwrap(), b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_read_missing_image() {
        let dir = TempDir::new().unwrap();
        let store = ImageStore::new(dir.path());
        let err = store.read("lipsa.jpg").await.unwrap_err();
        assert_eq!(err.to_string(), "Nonexistent image!");
    }
}
