//! Browsing installed fonts to pick one for activation
//!
//! A [`TreeCursor`] walks a directory tree one level at a time. It keeps the
//! path from the root on an explicit stack, so descending into deeply nested
//! archive layouts never recurses.

use crate::validation::is_valid_font_extension;
use crate::{FontpickError, FontpickResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory access needed by the cursor
pub trait EntrySource {
    /// Entries of `dir` in display order
    fn list_entries(&self, dir: &Path) -> FontpickResult<Vec<PathBuf>>;

    fn is_directory(&self, path: &Path) -> bool;
}

/// Filesystem-backed entries: subdirectories and font files, sorted
#[derive(Debug, Default, Clone, Copy)]
pub struct FsEntrySource;

impl EntrySource for FsEntrySource {
    fn list_entries(&self, dir: &Path) -> FontpickResult<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() || is_valid_font_extension(&path) {
                entries.push(path);
            }
        }
        entries.sort();
        Ok(entries)
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Result of selecting an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorStep {
    /// The cursor moved into a subdirectory
    Descended,
    /// A file was picked
    Picked(PathBuf),
}

/// Iterative cursor over a directory tree
pub struct TreeCursor<'a, S: EntrySource + ?Sized> {
    source: &'a S,
    trail: Vec<PathBuf>,
    entries: Vec<PathBuf>,
}

impl<'a, S: EntrySource + ?Sized> TreeCursor<'a, S> {
    pub fn new(source: &'a S, root: PathBuf) -> FontpickResult<Self> {
        let entries = source.list_entries(&root)?;
        Ok(Self {
            source,
            trail: vec![root],
            entries,
        })
    }

    pub fn current_dir(&self) -> &Path {
        // trail always holds at least the root
        self.trail.last().map(PathBuf::as_path).unwrap_or(Path::new(""))
    }

    /// Levels below the root
    pub fn depth(&self) -> usize {
        self.trail.len() - 1
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Select the entry at `index` (0-based) of the current listing
    pub fn select_entry(&mut self, index: usize) -> FontpickResult<CursorStep> {
        let entry = self.entries.get(index).cloned().ok_or_else(|| {
            FontpickError::InvalidSelectionToken {
                token: (index + 1).to_string(),
                reason: format!("out of range (1-{})", self.entries.len()),
            }
        })?;

        if self.source.is_directory(&entry) {
            self.entries = self.source.list_entries(&entry)?;
            self.trail.push(entry);
            Ok(CursorStep::Descended)
        } else {
            Ok(CursorStep::Picked(entry))
        }
    }

    /// Move to the parent directory. Returns false at the root.
    pub fn back(&mut self) -> FontpickResult<bool> {
        if self.trail.len() <= 1 {
            return Ok(false);
        }
        self.trail.pop();
        self.entries = self.source.list_entries(self.current_dir())?;
        Ok(true)
    }
}
