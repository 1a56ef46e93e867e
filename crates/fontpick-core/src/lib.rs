//! fontpick-core - Core catalog and install library for fontpick
//!
//! This library holds the release/catalog synchronization, the selection
//! parser and the per-font install pipeline. Network access, archive
//! extraction and host integration are reached through the traits defined
//! here so the state machine can run against in-memory fakes.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod activate;
pub mod catalog;
pub mod cleanup;
pub mod config;
pub mod installed;
pub mod pipeline;
pub mod release;
pub mod selection;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{offerable, sync_catalog, sync_release, CatalogState, Offerable, ReleaseState};
pub use installed::{FileInstalledStore, InstalledStore, MemoryInstalledStore};
pub use pipeline::{InstallPipeline, InstallReport, InstalledFont};
pub use release::ReleaseCache;
pub use selection::{MenuChoice, Selection};

/// Core errors for catalog and install operations
#[derive(Error, Debug)]
pub enum FontpickError {
    #[error("Missing dependency: {0}\n→ Suggestion: Install it with your package manager and make sure it is on PATH")]
    DependencyMissing(String),

    #[error("Could not fetch the font catalog: {0}\n→ Suggestion: Check your network connection or set FONTPICK_API_URL")]
    CatalogFetchFailed(String),

    #[error("Invalid selection '{token}': {reason}\n→ Suggestion: Use numbers from the menu, comma lists (1,3) or ranges (2-5)")]
    InvalidSelectionToken { token: String, reason: String },

    #[error("Unknown font name: {0}\n→ Suggestion: Run fontpick without --install to see the available fonts")]
    UnknownFontName(String),

    #[error("Download failed for {font}: {reason}\n→ Suggestion: Retry later; the release server may be unavailable")]
    DownloadFailed { font: String, reason: String },

    #[error("Extraction failed for {font}: {reason}\n→ Suggestion: Remove the archive and retry, or check free disk space")]
    ExtractFailed { font: String, reason: String },

    #[error("No fonts selected\n→ Suggestion: Pick at least one font from the menu or pass --install NAME")]
    NoSelectionMade,

    #[error("None of the {0} selected fonts could be installed\n→ Suggestion: Re-run with --verbose to see each failure")]
    InstallFailed(usize),

    #[error("Invalid font format: {0}\n→ Suggestion: Ensure the file is a valid font (.ttf, .otf, .woff, etc.)")]
    InvalidFormat(String),

    #[error("IO error: {0}\n→ Suggestion: Check file permissions and disk space")]
    IoError(#[from] std::io::Error),

    #[error("Unsupported operation: {0}\n→ Suggestion: This feature may not be available on your platform")]
    UnsupportedOperation(String),
}

/// Result type for fontpick operations
pub type FontpickResult<T> = Result<T, FontpickError>;

/// Per-invocation switches. Built once and never mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    /// Reinstall fonts even if the installed record lists them
    pub force: bool,
    /// Leave downloaded archives in the staging directory
    pub keep_archives: bool,
    /// The remote release differs from the cached one
    pub stale: bool,
    /// Print intended actions without downloading or writing
    pub dry_run: bool,
}

impl SessionFlags {
    pub fn new(force: bool, keep_archives: bool, dry_run: bool) -> Self {
        Self {
            force,
            keep_archives,
            stale: false,
            dry_run,
        }
    }

    /// Copy of these flags with the stale bit set from a release sync
    pub fn with_stale(self, stale: bool) -> Self {
        Self { stale, ..self }
    }

    /// Whether every remote font is offered and the installed record is reset
    pub fn refresh_all(&self) -> bool {
        self.force || self.stale
    }
}

/// Remote source of releases, font names and archives
pub trait CatalogSource {
    /// Fetch the identifier of the latest remote release
    fn fetch_release(&self) -> FontpickResult<String>;

    /// Fetch every font package name in feed order
    fn fetch_all_fonts(&self) -> FontpickResult<Vec<String>>;

    /// Probe whether an archive exists for `name` in `release`.
    /// Transport failures count as absent.
    fn font_archive_exists(&self, release: &str, name: &str) -> bool;

    /// Download the archive for `name` in `release` to `dest`
    fn download_archive(&self, release: &str, name: &str, dest: &Path) -> FontpickResult<()>;
}

/// Unpacks a downloaded archive into a directory
pub trait ArchiveExtractor {
    /// Extract `archive` into `dest`. `dest` is created if missing.
    fn extract(&self, archive: &Path, dest: &Path) -> FontpickResult<()>;
}

/// Host hook that makes a font file the active terminal font
pub trait FontActivator {
    /// Apply `font_file` and ask the host to reload its styling
    fn apply(&self, font_file: &Path) -> FontpickResult<()>;

    /// External commands the hook needs on PATH
    fn required_commands(&self) -> Vec<&'static str> {
        Vec::new()
    }
}

/// Location of the downloaded archive for `name` in the staging directory
pub fn archive_path(download_dir: &Path, name: &str) -> PathBuf {
    download_dir.join(format!("{name}.zip"))
}
