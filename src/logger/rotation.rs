//! Size-based rotation of the log file

use std::fs;
use std::path::{Path, PathBuf};

use jiff::Timestamp;

use crate::logger::config::RotationConfig;
use crate::logger::error::LoggerError;

/// Renames the active log file once it grows past the limit and prunes
/// the oldest rotated files.
pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn should_rotate(&self, current_size: u64) -> bool {
        current_size >= self.config.max_size
    }

    /// Move `current` aside as `{stem}.{millis}.{ext}` and drop rotated
    /// files beyond `max_files`.
    pub fn rotate(&self, current: &Path) -> Result<(), LoggerError> {
        if current.exists() {
            fs::rename(current, self.rotated_path(current))?;
        }
        self.cleanup(current)
    }

    fn rotated_path(&self, base: &Path) -> PathBuf {
        let stem = base.file_stem().unwrap_or_default().to_string_lossy();
        let ext = base.extension().map(|e| e.to_string_lossy());
        let millis = Timestamp::now().as_millisecond();

        let mut attempt = 0u32;
        loop {
            let suffix = if attempt == 0 {
                millis.to_string()
            } else {
                format!("{}-{}", millis, attempt)
            };
            let name = match &ext {
                Some(ext) => format!("{}.{}.{}", stem, suffix, ext),
                None => format!("{}.{}", stem, suffix),
            };
            let candidate = base.with_file_name(name);
            if !candidate.exists() {
                return candidate;
            }
            attempt += 1;
        }
    }

    /// Rotated files belonging to `base`, oldest first.
    pub fn rotated_files(&self, base: &Path) -> Result<Vec<PathBuf>, LoggerError> {
        let parent = match base.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = format!("{}.", base.file_stem().unwrap_or_default().to_string_lossy());
        let active = base.file_name().unwrap_or_default();

        let mut files: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name().is_some_and(|name| {
                    name != active && name.to_string_lossy().starts_with(&prefix)
                })
            })
            .collect();

        files.sort_by_key(|path| {
            fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .map(|modified| (modified, path.clone()))
        });
        Ok(files)
    }

    fn cleanup(&self, base: &Path) -> Result<(), LoggerError> {
        let files = self.rotated_files(base)?;
        if files.len() <= self.config.max_files {
            return Ok(());
        }

        let excess = files.len() - self.config.max_files;
        for path in files.into_iter().take(excess) {
            fs::remove_file(&path).map_err(|e| {
                LoggerError::rotation(format!("failed to remove {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manager(max_size: u64, max_files: usize) -> RotationManager {
        RotationManager::new(RotationConfig {
            max_size,
            max_files,
        })
    }

    #[test]
    fn test_should_rotate_at_limit() {
        let rotation = manager(100, 3);
        assert!(!rotation.should_rotate(99));
        assert!(rotation.should_rotate(100));
        assert!(rotation.should_rotate(250));
    }

    #[test]
    fn test_rotate_moves_active_file() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("app.log");
        fs::write(&log, "first").unwrap();

        let rotation = manager(1, 3);
        rotation.rotate(&log).unwrap();

        assert!(!log.exists());
        let rotated = rotation.rotated_files(&log).unwrap();
        assert_eq!(rotated.len(), 1);
        assert_eq!(fs::read_to_string(&rotated[0]).unwrap(), "first");
        assert!(rotated[0].to_string_lossy().ends_with(".log"));
    }

    #[test]
    fn test_rotate_keeps_at_most_max_files() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("app.log");
        let rotation = manager(1, 2);

        for i in 0..5 {
            fs::write(&log, format!("generation {}", i)).unwrap();
            rotation.rotate(&log).unwrap();
        }

        assert_eq!(rotation.rotated_files(&log).unwrap().len(), 2);
    }

    #[test]
    fn test_rotate_without_active_file_is_noop() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("missing.log");
        manager(1, 2).rotate(&log).unwrap();
        assert!(manager(1, 2).rotated_files(&log).unwrap().is_empty());
    }
}
