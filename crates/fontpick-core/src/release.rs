//! Persisted release identifier

use crate::FontpickResult;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the release cache inside the cache directory
pub const RELEASE_FILE: &str = "release";

/// Single-value cache holding the last-seen remote release
#[derive(Debug, Clone)]
pub struct ReleaseCache {
    path: PathBuf,
}

impl ReleaseCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache stored as `release` inside `cache_dir`
    pub fn in_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join(RELEASE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached identifier. Missing or blank files yield `None`.
    pub fn read_cached_release(&self) -> FontpickResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    /// Overwrite the cached identifier (temp file + rename)
    pub fn write_cached_release(&self, id: &str) -> FontpickResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, format!("{id}\n"))?;
        fs::rename(&temp_path, &self.path)?;

        log::debug!("Cached release {} at {}", id, self.path.display());
        Ok(())
    }
}

/// True when the fetched release differs from the cached one.
/// An empty cache is always stale.
pub fn is_stale(cached: Option<&str>, fetched: &str) -> bool {
    cached != Some(fetched)
}
