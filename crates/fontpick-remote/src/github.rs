use fontpick_core::config::Remote;
use fontpick_core::{CatalogSource, FontpickError, FontpickResult};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use crate::USER_AGENT;

/// Directory of the repository that holds one entry per font package
const FONTS_TREE: &str = "patched-fonts";
const FONTS_REF: &str = "master";

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Extract the `tag_name` of a latest-release response
pub fn parse_release_tag(body: &str) -> FontpickResult<String> {
    let release: LatestRelease = serde_json::from_str(body)
        .map_err(|e| FontpickError::CatalogFetchFailed(format!("Malformed release response: {e}")))?;

    let tag = release.tag_name.trim();
    if tag.is_empty() {
        return Err(FontpickError::CatalogFetchFailed(
            "Release response has an empty tag".to_string(),
        ));
    }
    Ok(tag.to_string())
}

/// Extract directory names from a repository contents listing, in listing order
pub fn parse_font_entries(body: &str) -> FontpickResult<Vec<String>> {
    let entries: Vec<ContentEntry> = serde_json::from_str(body)
        .map_err(|e| FontpickError::CatalogFetchFailed(format!("Malformed catalog response: {e}")))?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.kind == "dir")
        .map(|entry| entry.name)
        .collect())
}

/// Font catalog backed by a GitHub repository and its releases
pub struct GithubCatalog {
    client: Client,
    api_url: String,
    repo_url: String,
}

impl GithubCatalog {
    pub fn new(remote: &Remote) -> FontpickResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(remote.timeout_secs))
            .build()
            .map_err(|e| FontpickError::CatalogFetchFailed(format!("HTTP client setup: {e}")))?;

        Ok(Self {
            client,
            api_url: remote.api_url.trim_end_matches('/').to_string(),
            repo_url: remote.repo_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn release_url(&self) -> String {
        format!("{}/releases/latest", self.api_url)
    }

    pub fn contents_url(&self) -> String {
        format!("{}/contents/{}?ref={}", self.api_url, FONTS_TREE, FONTS_REF)
    }

    pub fn archive_url(&self, release: &str, name: &str) -> String {
        format!("{}/releases/download/{}/{}.zip", self.repo_url, release, name)
    }

    fn get_text(&self, url: &str) -> FontpickResult<String> {
        log::debug!("GET {}", url);
        self.client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())
            .map_err(|e| FontpickError::CatalogFetchFailed(format!("{url}: {e}")))
    }
}

impl CatalogSource for GithubCatalog {
    fn fetch_release(&self) -> FontpickResult<String> {
        parse_release_tag(&self.get_text(&self.release_url())?)
    }

    fn fetch_all_fonts(&self) -> FontpickResult<Vec<String>> {
        let fonts = parse_font_entries(&self.get_text(&self.contents_url())?)?;
        if fonts.is_empty() {
            return Err(FontpickError::CatalogFetchFailed(
                "Catalog lists no fonts".to_string(),
            ));
        }
        Ok(fonts)
    }

    fn font_archive_exists(&self, release: &str, name: &str) -> bool {
        let url = self.archive_url(release, name);
        log::debug!("HEAD {}", url);
        match self.client.head(&url).send().and_then(|r| r.error_for_status()) {
            Ok(_) => true,
            Err(e) => {
                log::debug!("{} is not available: {}", name, e);
                false
            }
        }
    }

    fn download_archive(&self, release: &str, name: &str, dest: &Path) -> FontpickResult<()> {
        let url = self.archive_url(release, name);
        let failed = |reason: String| FontpickError::DownloadFailed {
            font: name.to_string(),
            reason,
        };

        log::info!("Downloading {}", url);
        let mut response = self
            .client
            .get(&url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| failed(e.to_string()))?;

        let mut file = File::create(dest).map_err(|e| failed(e.to_string()))?;
        if let Err(e) = response.copy_to(&mut file) {
            drop(file);
            let _ = fs::remove_file(dest);
            return Err(failed(e.to_string()));
        }
        Ok(())
    }
}
