//! Installed-fonts record
//!
//! The record is a newline-delimited list of font names. Stores expose it as
//! a set; appends are persisted immediately so a crash mid-run leaves the
//! record consistent with the fonts that actually completed.

use crate::FontpickResult;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the installed record inside the cache directory
pub const INSTALLED_FILE: &str = "installed";

/// Persistence adapter for the installed-fonts record
pub trait InstalledStore {
    /// Every recorded name. A missing record is an empty set.
    fn read_all(&self) -> FontpickResult<BTreeSet<String>>;

    /// Record one more installed font
    fn append(&self, name: &str) -> FontpickResult<()>;

    /// Forget every recorded font
    fn clear(&self) -> FontpickResult<()>;

    /// Drop a single name; returns whether it was recorded
    fn remove(&self, name: &str) -> FontpickResult<bool>;
}

/// Record stored as a flat file
#[derive(Debug, Clone)]
pub struct FileInstalledStore {
    path: PathBuf,
}

impl FileInstalledStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Record stored as `installed` inside `cache_dir`
    pub fn in_dir(cache_dir: &Path) -> Self {
        Self::new(cache_dir.join(INSTALLED_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_lines(&self) -> FontpickResult<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl InstalledStore for FileInstalledStore {
    fn read_all(&self) -> FontpickResult<BTreeSet<String>> {
        Ok(self.read_lines()?.into_iter().collect())
    }

    fn append(&self, name: &str) -> FontpickResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{name}")?;
        Ok(())
    }

    fn clear(&self) -> FontpickResult<()> {
        if self.path.exists() {
            fs::write(&self.path, "")?;
        }
        Ok(())
    }

    fn remove(&self, name: &str) -> FontpickResult<bool> {
        let lines = self.read_lines()?;
        let kept: Vec<&String> = lines.iter().filter(|line| line.as_str() != name).collect();
        if kept.len() == lines.len() {
            return Ok(false);
        }

        let mut content = String::new();
        for line in kept {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(&self.path, content)?;
        Ok(true)
    }
}

/// In-memory record for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryInstalledStore {
    names: RefCell<Vec<String>>,
}

impl MemoryInstalledStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: RefCell::new(names.into_iter().map(Into::into).collect()),
        }
    }

    /// Names in append order, duplicates included
    pub fn entries(&self) -> Vec<String> {
        self.names.borrow().clone()
    }
}

impl InstalledStore for MemoryInstalledStore {
    fn read_all(&self) -> FontpickResult<BTreeSet<String>> {
        Ok(self.names.borrow().iter().cloned().collect())
    }

    fn append(&self, name: &str) -> FontpickResult<()> {
        self.names.borrow_mut().push(name.to_string());
        Ok(())
    }

    fn clear(&self) -> FontpickResult<()> {
        self.names.borrow_mut().clear();
        Ok(())
    }

    fn remove(&self, name: &str) -> FontpickResult<bool> {
        let mut names = self.names.borrow_mut();
        let before = names.len();
        names.retain(|n| n != name);
        Ok(names.len() != before)
    }
}
