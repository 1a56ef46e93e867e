//! fontpick-remote - Remote catalog and archive handling for fontpick
//!
//! Implements the `fontpick-core` collaborator traits: [`GithubCatalog`]
//! talks to a GitHub-hosted font repository over a blocking HTTP client and
//! [`ZipExtractor`] unpacks the downloaded release archives.

mod archive;
mod github;

pub use archive::ZipExtractor;
pub use github::{parse_font_entries, parse_release_tag, GithubCatalog};

/// User agent sent with every request (GitHub rejects anonymous clients)
pub const USER_AGENT: &str = concat!("fontpick/", env!("CARGO_PKG_VERSION"));
