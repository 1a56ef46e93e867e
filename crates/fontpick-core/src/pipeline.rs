//! Per-font install pipeline
//!
//! Each selected font goes through download -> extract -> record. A step only
//! runs when the previous one succeeded, and one font's failure never stops
//! the remaining fonts.

use crate::installed::InstalledStore;
use crate::selection::{is_valid_font_name, Selection};
use crate::validation::font_files_under;
use crate::{
    archive_path, ArchiveExtractor, CatalogSource, FontpickError, FontpickResult, SessionFlags,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A font that made it through every pipeline step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledFont {
    pub name: String,
    /// Directory the archive was extracted into
    pub dir: PathBuf,
    /// Font files found in `dir`, for post-install hooks
    pub files: Vec<PathBuf>,
}

/// A font whose pipeline stopped early
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFailure {
    pub name: String,
    pub error: String,
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    /// Fonts the pipeline started on
    pub attempted: usize,
    pub installed: Vec<InstalledFont>,
    pub failed: Vec<FontFailure>,
    /// Fonts a dry run would have installed
    pub planned: Vec<String>,
}

impl InstallReport {
    pub fn any_installed(&self) -> bool {
        !self.installed.is_empty()
    }

    /// Every attempted font failed
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.installed.is_empty() && self.failed.len() == self.attempted
    }

    /// Every extracted font file across installed fonts
    pub fn font_files(&self) -> Vec<&Path> {
        self.installed
            .iter()
            .flat_map(|font| font.files.iter().map(PathBuf::as_path))
            .collect()
    }
}

/// Drives downloads and extraction against injected collaborators
pub struct InstallPipeline<'a> {
    source: &'a dyn CatalogSource,
    extractor: &'a dyn ArchiveExtractor,
    store: &'a dyn InstalledStore,
    download_dir: PathBuf,
    install_dir: PathBuf,
}

impl<'a> InstallPipeline<'a> {
    pub fn new(
        source: &'a dyn CatalogSource,
        extractor: &'a dyn ArchiveExtractor,
        store: &'a dyn InstalledStore,
        download_dir: PathBuf,
        install_dir: PathBuf,
    ) -> Self {
        Self {
            source,
            extractor,
            store,
            download_dir,
            install_dir,
        }
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    /// Install every font in `selection` from `release`, one at a time.
    ///
    /// Download and extraction failures are collected in the report. Errors
    /// writing the installed record abort the run.
    pub fn run(
        &self,
        release: &str,
        selection: &Selection,
        flags: &SessionFlags,
    ) -> FontpickResult<InstallReport> {
        let mut report = InstallReport::default();

        for name in selection {
            if flags.dry_run {
                log::info!(
                    "DRY-RUN: would download {} ({}) and extract to {}",
                    name,
                    release,
                    self.install_dir.join(name).display()
                );
                report.planned.push(name.clone());
                continue;
            }

            report.attempted += 1;
            match self.install_one(release, name) {
                Ok(font) => {
                    self.store.append(name)?;
                    log::info!("Installed {} into {}", name, font.dir.display());
                    report.installed.push(font);
                }
                Err(err) => {
                    log::warn!("Skipping {}: {}", name, err);
                    report.failed.push(FontFailure {
                        name: name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    fn install_one(&self, release: &str, name: &str) -> FontpickResult<InstalledFont> {
        if !is_valid_font_name(name) {
            return Err(FontpickError::UnknownFontName(name.to_string()));
        }

        let archive = archive_path(&self.download_dir, name);
        let download_failed = |reason: String| FontpickError::DownloadFailed {
            font: name.to_string(),
            reason,
        };

        fs::create_dir_all(&self.download_dir).map_err(|e| download_failed(e.to_string()))?;
        // The transports cannot overwrite, so a leftover archive goes first
        if archive.exists() {
            log::debug!("Removing leftover archive {}", archive.display());
            fs::remove_file(&archive).map_err(|e| download_failed(e.to_string()))?;
        }

        self.source
            .download_archive(release, name, &archive)
            .map_err(|e| match e {
                FontpickError::DownloadFailed { .. } => e,
                other => download_failed(other.to_string()),
            })?;

        let dest = self.install_dir.join(name);
        let extract_failed = |reason: String| FontpickError::ExtractFailed {
            font: name.to_string(),
            reason,
        };

        if dest.exists() {
            fs::remove_dir_all(&dest).map_err(|e| extract_failed(e.to_string()))?;
        }
        self.extractor
            .extract(&archive, &dest)
            .map_err(|e| match e {
                FontpickError::ExtractFailed { .. } => e,
                other => extract_failed(other.to_string()),
            })?;

        let files = font_files_under(&dest)?;
        Ok(InstalledFont {
            name: name.to_string(),
            dir: dest,
            files,
        })
    }
}
