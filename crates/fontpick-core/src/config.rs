//! Configuration management for fontpick
//!
//! Settings come from environment variables with platform defaults for the
//! install, download and cache directories.

use anyhow::Result;
use std::env;
use std::path::PathBuf;

use crate::installed::FileInstalledStore;
use crate::release::ReleaseCache;

/// Default GitHub API root of the font repository
pub const DEFAULT_API_URL: &str = "https://api.github.com/repos/ryanoasis/nerd-fonts";
/// Default web root used to build archive download URLs
pub const DEFAULT_REPO_URL: &str = "https://github.com/ryanoasis/nerd-fonts";
/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Global configuration for fontpick operations
#[derive(Debug, Clone)]
pub struct FontpickConfig {
    /// Install, staging and cache directories
    pub paths: Paths,
    /// Remote endpoints and transport settings
    pub remote: Remote,
    /// Logging and output settings
    pub logging: Logging,
}

/// Directory configuration
#[derive(Debug, Clone)]
pub struct Paths {
    /// Fonts are extracted into one subdirectory each (FONTPICK_INSTALL_DIR)
    pub install_dir: PathBuf,
    /// Archives are staged here (FONTPICK_DOWNLOAD_DIR)
    pub download_dir: PathBuf,
    /// Holds the release and installed files (FONTPICK_CACHE_DIR)
    pub cache_dir: PathBuf,
}

/// Remote source configuration
#[derive(Debug, Clone)]
pub struct Remote {
    /// API root for release and catalog queries (FONTPICK_API_URL)
    pub api_url: String,
    /// Web root for archive downloads (FONTPICK_REPO_URL)
    pub repo_url: String,
    /// Per-request timeout in seconds (FONTPICK_TIMEOUT_SECS)
    pub timeout_secs: u64,
}

/// Logging and output configuration
#[derive(Debug, Clone)]
pub struct Logging {
    /// Default log filter when RUST_LOG is unset (FONTPICK_LOG_LEVEL)
    pub level: String,
}

impl Default for FontpickConfig {
    fn default() -> Self {
        Self::from_env().unwrap_or_else(|_| Self::minimal())
    }
}

impl FontpickConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            paths: Paths::from_env()?,
            remote: Remote::from_env()?,
            logging: Logging::from_env()?,
        })
    }

    /// Create minimal default configuration
    pub fn minimal() -> Self {
        Self {
            paths: Paths::minimal(),
            remote: Remote::minimal(),
            logging: Logging::minimal(),
        }
    }

    /// Release cache in the configured cache directory
    pub fn release_cache(&self) -> ReleaseCache {
        ReleaseCache::in_dir(&self.paths.cache_dir)
    }

    /// Installed record in the configured cache directory
    pub fn installed_store(&self) -> FileInstalledStore {
        FileInstalledStore::in_dir(&self.paths.cache_dir)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.remote.api_url.trim().is_empty() {
            anyhow::bail!("API URL must not be empty");
        }

        if self.remote.repo_url.trim().is_empty() {
            anyhow::bail!("Repository URL must not be empty");
        }

        if self.remote.timeout_secs == 0 {
            anyhow::bail!("Timeout must be greater than 0");
        }

        if self.paths.install_dir.as_os_str().is_empty() {
            anyhow::bail!("Install directory must not be empty");
        }

        Ok(())
    }
}

impl Paths {
    pub fn from_env() -> Result<Self> {
        let install_dir = env::var("FONTPICK_INSTALL_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(default_install_dir);

        let download_dir = env::var("FONTPICK_DOWNLOAD_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);

        let cache_dir = env::var("FONTPICK_CACHE_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_dir);

        Ok(Self {
            install_dir,
            download_dir,
            cache_dir,
        })
    }

    pub fn minimal() -> Self {
        Self {
            install_dir: default_install_dir(),
            download_dir: default_download_dir(),
            cache_dir: default_cache_dir(),
        }
    }
}

impl Remote {
    pub fn from_env() -> Result<Self> {
        let api_url = env::var("FONTPICK_API_URL")
            .ok()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let repo_url = env::var("FONTPICK_REPO_URL")
            .ok()
            .unwrap_or_else(|| DEFAULT_REPO_URL.to_string());

        let timeout_secs = env::var("FONTPICK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            repo_url: repo_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    pub fn minimal() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Logging {
    pub fn from_env() -> Result<Self> {
        let level = env::var("FONTPICK_LOG_LEVEL")
            .ok()
            .unwrap_or_else(|| "warn".to_string());

        Ok(Self { level })
    }

    pub fn minimal() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Get default font install directory based on platform
fn default_install_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("~"))
            .join("Library")
            .join("Fonts")
    }

    #[cfg(target_os = "windows")]
    {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("C:\\Users\\Default\\AppData\\Local"))
            .join("Microsoft")
            .join("Windows")
            .join("Fonts")
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        dirs::font_dir().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join(".local")
                .join("share")
                .join("fonts")
        })
    }
}

/// Get default archive staging directory
fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .unwrap_or_else(env::temp_dir)
        .join("fontpick")
}

/// Get default cache directory
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(env::temp_dir)
        .join("fontpick")
}
