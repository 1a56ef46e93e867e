//! Host integration: dependency checks, font cache refresh, Termux activation

use fontpick_core::{FontActivator, FontpickError, FontpickResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Command that rebuilds the fontconfig cache
pub const FC_CACHE: &str = "fc-cache";
/// Command that makes Termux reload its styling
pub const TERMUX_RELOAD: &str = "termux-reload-settings";

/// True when running inside Termux
pub fn is_termux() -> bool {
    std::env::var_os("TERMUX_VERSION").is_some()
}

/// Fail with `DependencyMissing` for the first command not found on PATH
pub fn check_dependencies(commands: &[&str]) -> FontpickResult<()> {
    for command in commands {
        if which::which(command).is_err() {
            return Err(FontpickError::DependencyMissing((*command).to_string()));
        }
        log::debug!("Found dependency {}", command);
    }
    Ok(())
}

/// Runs `fc-cache` over the install directory after fonts change
#[derive(Debug, Clone)]
pub struct FontCache {
    command: String,
}

impl FontCache {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// The refresher the current platform needs, if any
    pub fn for_platform() -> Option<Self> {
        if cfg!(target_os = "linux") && !is_termux() {
            Some(Self::new(FC_CACHE))
        } else {
            None
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn refresh(&self, dir: &Path) -> FontpickResult<()> {
        log::debug!("Running {} -f {}", self.command, dir.display());
        let status = Command::new(&self.command).arg("-f").arg(dir).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(FontpickError::UnsupportedOperation(format!(
                "{} exited with {}",
                self.command, status
            )))
        }
    }
}

/// Applies a font as the Termux terminal font
#[derive(Debug, Clone)]
pub struct TermuxActivator {
    target: PathBuf,
}

impl TermuxActivator {
    pub fn new(target: PathBuf) -> Self {
        Self { target }
    }

    /// Activator writing to `~/.termux/font.ttf`
    pub fn for_home() -> FontpickResult<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            FontpickError::UnsupportedOperation("Cannot determine home directory".to_string())
        })?;
        Ok(Self::new(home.join(".termux").join("font.ttf")))
    }

    /// Copy `font_file` over the Termux font without reloading
    pub fn install_file(&self, font_file: &Path) -> FontpickResult<()> {
        if let Some(parent) = self.target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(font_file, &self.target)?;
        Ok(())
    }
}

impl FontActivator for TermuxActivator {
    fn apply(&self, font_file: &Path) -> FontpickResult<()> {
        self.install_file(font_file)?;

        let status = Command::new(TERMUX_RELOAD).status()?;
        if !status.success() {
            return Err(FontpickError::UnsupportedOperation(format!(
                "{TERMUX_RELOAD} exited with {status}"
            )));
        }
        Ok(())
    }

    fn required_commands(&self) -> Vec<&'static str> {
        vec![TERMUX_RELOAD]
    }
}
