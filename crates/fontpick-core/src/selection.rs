//! Selection parsing for the menu and direct-install paths
//!
//! Menu input is a comma-separated list of 1-based ordinals into the
//! offerable list, where each entry is either `N` or an inclusive range
//! `X-Y`. One bad entry rejects the whole line. A bare `q` entry quits.

use crate::{CatalogSource, FontpickError, FontpickResult};
use std::collections::BTreeSet;
use std::path::{Component, Path};

/// Entry that ends the menu without installing anything
pub const QUIT_TOKEN: &str = "q";

/// Fonts chosen for one run, unique and in a stable order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    fonts: Vec<String>,
}

impl Selection {
    /// Build a selection, dropping repeated names but keeping first-seen order
    pub fn new<I, S>(fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let fonts = fonts
            .into_iter()
            .map(Into::into)
            .filter(|name: &String| seen.insert(name.clone()))
            .collect();
        Self { fonts }
    }

    pub fn fonts(&self) -> &[String] {
        &self.fonts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.fonts.iter()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.iter().any(|f| f == name)
    }

    /// Selection without the given names
    pub fn without(&self, names: &BTreeSet<String>) -> Self {
        Self::new(self.fonts.iter().filter(|f| !names.contains(f.as_str())).cloned())
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.fonts.iter()
    }
}

/// Result of one menu submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Quit,
    Fonts(Selection),
}

fn invalid(token: &str, reason: impl Into<String>) -> FontpickError {
    FontpickError::InvalidSelectionToken {
        token: token.to_string(),
        reason: reason.into(),
    }
}

/// Parse a strictly numeric 1-based ordinal and bound-check it
fn parse_ordinal(raw: &str, token: &str, len: usize) -> FontpickResult<usize> {
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(token, "not a number"));
    }

    let n: usize = raw
        .parse()
        .map_err(|_| invalid(token, "number is too large"))?;
    if n == 0 || n > len {
        return Err(invalid(token, format!("out of range (1-{len})")));
    }
    Ok(n)
}

/// Parse one menu submission against the offerable list
pub fn parse_menu_selection(input: &str, offerable: &[String]) -> FontpickResult<MenuChoice> {
    if input.trim().is_empty() {
        return Err(FontpickError::NoSelectionMade);
    }

    let tokens: Vec<&str> = input.split(',').map(str::trim).collect();
    if tokens.contains(&QUIT_TOKEN) {
        return Ok(MenuChoice::Quit);
    }

    let len = offerable.len();
    let mut ordinals = BTreeSet::new();

    for token in tokens {
        if token.is_empty() {
            return Err(invalid(token, "empty entry"));
        }

        match token.split_once('-') {
            Some((start, end)) => {
                let (start, end) = (start.trim(), end.trim());
                if start.is_empty() || end.is_empty() {
                    return Err(invalid(token, "range is missing a bound"));
                }
                let first = parse_ordinal(start, token, len)?;
                let last = parse_ordinal(end, token, len)?;
                if first > last {
                    return Err(invalid(token, "range start is greater than its end"));
                }
                ordinals.extend(first..=last);
            }
            None => {
                ordinals.insert(parse_ordinal(token, token, len)?);
            }
        }
    }

    Ok(MenuChoice::Fonts(Selection::new(
        ordinals.into_iter().map(|n| offerable[n - 1].clone()),
    )))
}

/// A font name is a single plain path component: no separators, no `.` or `..`
pub fn is_valid_font_name(name: &str) -> bool {
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return false;
    }

    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Fail with `UnknownFontName` on the first name that is not a plain font name
pub fn ensure_font_names<'a, I>(names: I) -> FontpickResult<()>
where
    I: IntoIterator<Item = &'a String>,
{
    for name in names {
        if !is_valid_font_name(name) {
            return Err(FontpickError::UnknownFontName(name.clone()));
        }
    }
    Ok(())
}

/// Split a direct-install list into names, skipping blanks and repeats
pub fn parse_direct_names(input: &str) -> Vec<String> {
    Selection::new(
        input
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty()),
    )
    .fonts
}

/// Check every direct-install name against the remote release.
/// The first unknown name fails the whole batch.
pub fn validate_direct(
    names: &[String],
    source: &dyn CatalogSource,
    release: &str,
) -> FontpickResult<Selection> {
    if names.is_empty() {
        return Err(FontpickError::NoSelectionMade);
    }

    ensure_font_names(names)?;

    for name in names {
        if !source.font_archive_exists(release, name) {
            return Err(FontpickError::UnknownFontName(name.clone()));
        }
        log::debug!("{} is available in {}", name, release);
    }

    Ok(Selection::new(names.iter().cloned()))
}
