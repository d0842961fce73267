use crate::cloud_scan::domain::{CacheKey, Report};
use crate::ports::outbound::CacheStore;
use crate::shared::error::CloudScanError;
use crate::shared::security::{
    validate_file_size, validate_not_symlink, validate_regular_file, MAX_CACHE_FILE_SIZE,
};
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Name of the report file inside a cache slot directory
const CACHE_FILE_NAME: &str = "data.json";

/// FileSystemCacheStore adapter keeping one JSON report per cache key
///
/// Layout: `<cache_dir>/cloud/<provider>/<account_id>/<region>/data.json`.
/// Writes go to a temporary file in the slot directory which is then renamed
/// over the old entry, so readers see either the old or the new report.
pub struct FileSystemCacheStore {
    cache_dir: PathBuf,
}

impl FileSystemCacheStore {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Path of the report file for `key`
    pub fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir.join(key.relative_dir()).join(CACHE_FILE_NAME)
    }

    fn io_error(path: &Path, details: impl Into<String>) -> anyhow::Error {
        CloudScanError::CacheIo {
            path: path.to_path_buf(),
            details: details.into(),
        }
        .into()
    }

    /// Parses cached content, treating anything unusable as a miss
    fn parse_entry(path: &Path, key: &CacheKey, content: &str) -> Option<Report> {
        let report: Report = match serde_json::from_str(content) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        if let Err(e) = report.validate() {
            tracing::warn!("Ignoring invalid cache entry {}: {}", path.display(), e);
            return None;
        }

        if report.account_id() != key.account_id() || report.region() != key.region() {
            tracing::warn!(
                "Ignoring cache entry {}: it belongs to {}/{}",
                path.display(),
                report.account_id(),
                report.region()
            );
            return None;
        }

        Some(report)
    }
}

impl CacheStore for FileSystemCacheStore {
    fn load(&self, key: &CacheKey) -> Result<Option<Report>> {
        let path = self.entry_path(key);

        match fs::symlink_metadata(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(&path, e.to_string())),
        }

        // Security checks before reading
        let size = validate_regular_file(&path, "cache entry")
            .map_err(|e| Self::io_error(&path, e.to_string()))?;
        validate_file_size(size, &path, MAX_CACHE_FILE_SIZE)
            .map_err(|e| Self::io_error(&path, e.to_string()))?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                tracing::warn!("Ignoring non UTF-8 cache entry {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(Self::io_error(&path, e.to_string())),
        };

        Ok(Self::parse_entry(&path, key, &content))
    }

    fn save(&self, key: &CacheKey, report: &Report) -> Result<()> {
        let path = self.entry_path(key);
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cache_dir.clone());

        fs::create_dir_all(&dir).map_err(|e| {
            Self::io_error(&dir, format!("Failed to create cache directory: {}", e))
        })?;

        if fs::symlink_metadata(&path).is_ok() {
            validate_not_symlink(&path, "write").map_err(|e| Self::io_error(&path, e.to_string()))?;
        }

        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| Self::io_error(&path, format!("Failed to serialize report: {}", e)))?;

        let mut tmp = NamedTempFile::new_in(&dir)
            .map_err(|e| Self::io_error(&dir, format!("Failed to create temporary file: {}", e)))?;
        tmp.write_all(&json)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Self::io_error(tmp.path(), e.to_string()))?;
        tmp.persist(&path)
            .map_err(|e| Self::io_error(&path, e.error.to_string()))?;

        tracing::debug!("Cache entry written: {}", path.display());
        Ok(())
    }
}
