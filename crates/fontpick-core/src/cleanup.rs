//! Post-install archive cleanup

use crate::selection::Selection;
use crate::{archive_path, FontpickResult};
use std::fs;
use std::path::{Path, PathBuf};

/// What happened to the downloaded archives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Archives removed from the staging directory
    Removed(usize),
    /// Archives kept on request, in this directory
    Kept(PathBuf),
    /// Nothing was installed so nothing was touched
    Skipped,
}

/// Remove the archive of every selected font once anything was installed.
///
/// Removal covers the whole selection, including fonts whose install failed.
pub fn cleanup_archives(
    download_dir: &Path,
    selection: &Selection,
    keep_archives: bool,
    any_installed: bool,
) -> FontpickResult<CleanupOutcome> {
    if keep_archives {
        return Ok(CleanupOutcome::Kept(download_dir.to_path_buf()));
    }
    if !any_installed {
        return Ok(CleanupOutcome::Skipped);
    }

    let mut removed = 0;
    for name in selection {
        let archive = archive_path(download_dir, name);
        if archive.exists() {
            fs::remove_file(&archive)?;
            log::debug!("Removed {}", archive.display());
            removed += 1;
        }
    }

    Ok(CleanupOutcome::Removed(removed))
}
