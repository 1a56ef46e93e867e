//! Release synchronization and catalog reconciliation

use crate::installed::InstalledStore;
use crate::release::{is_stale, ReleaseCache};
use crate::{CatalogSource, FontpickResult, SessionFlags};
use std::collections::BTreeSet;

/// Outcome of comparing the remote release with the cached one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseState {
    /// Release fetched from the remote source
    pub release: String,
    /// Release cached before this run
    pub previous: Option<String>,
    pub stale: bool,
}

/// Fonts offered for selection and whether the installed record must be reset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offerable {
    pub fonts: Vec<String>,
    pub clear_installed: bool,
}

/// Everything the selection step needs from a catalog sync
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub release: ReleaseState,
    /// Session flags with the stale bit resolved
    pub flags: SessionFlags,
    /// Full remote catalog in feed order
    pub all: Vec<String>,
    /// Installed record as it was before any reset
    pub previously_installed: BTreeSet<String>,
    /// Catalog entries offered in the menu, in feed order
    pub offerable: Vec<String>,
}

/// Compute the fonts to offer.
///
/// Stale or forced runs offer the full catalog and ask for the installed
/// record to be cleared; otherwise installed names are filtered out while
/// the feed order is kept.
pub fn offerable(
    all: &[String],
    installed: &BTreeSet<String>,
    stale: bool,
    force: bool,
) -> Offerable {
    if stale || force {
        return Offerable {
            fonts: all.to_vec(),
            clear_installed: true,
        };
    }

    Offerable {
        fonts: all
            .iter()
            .filter(|name| !installed.contains(name.as_str()))
            .cloned()
            .collect(),
        clear_installed: false,
    }
}

/// Read the installed record
pub fn fetch_installed_fonts(store: &dyn InstalledStore) -> FontpickResult<BTreeSet<String>> {
    store.read_all()
}

/// Fetch the remote release and persist it when it changed.
///
/// The cache is updated before anything is installed, so a failing run still
/// consumes the stale signal. Dry runs never write.
pub fn sync_release(
    source: &dyn CatalogSource,
    cache: &ReleaseCache,
    flags: &SessionFlags,
) -> FontpickResult<ReleaseState> {
    let release = source.fetch_release()?;
    let previous = cache.read_cached_release()?;
    let stale = is_stale(previous.as_deref(), &release);

    if stale {
        log::info!(
            "Release changed: {} -> {}",
            previous.as_deref().unwrap_or("<none>"),
            release
        );
        if !flags.dry_run {
            cache.write_cached_release(&release)?;
        }
    } else {
        log::debug!("Release {} is current", release);
    }

    Ok(ReleaseState {
        release,
        previous,
        stale,
    })
}

/// Clear the installed record when the session refreshes everything.
/// Returns the record as it was before the reset.
pub fn reset_installed_if_needed(
    store: &dyn InstalledStore,
    flags: &SessionFlags,
) -> FontpickResult<BTreeSet<String>> {
    let installed = fetch_installed_fonts(store)?;
    if flags.refresh_all() && !flags.dry_run {
        log::debug!("Clearing installed record ({} entries)", installed.len());
        store.clear()?;
    }
    Ok(installed)
}

/// Run the full menu-mode sync: release, catalog, installed record, reconcile
pub fn sync_catalog(
    source: &dyn CatalogSource,
    cache: &ReleaseCache,
    store: &dyn InstalledStore,
    flags: SessionFlags,
) -> FontpickResult<CatalogState> {
    let release = sync_release(source, cache, &flags)?;
    let flags = flags.with_stale(release.stale);

    let all = source.fetch_all_fonts()?;
    log::debug!("Catalog lists {} fonts", all.len());

    let installed = fetch_installed_fonts(store)?;
    let offer = offerable(&all, &installed, flags.stale, flags.force);
    if offer.clear_installed && !flags.dry_run {
        store.clear()?;
    }

    Ok(CatalogState {
        release,
        flags,
        all,
        previously_installed: installed,
        offerable: offer.fonts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn set(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filters_installed_and_keeps_feed_order() {
        let all = names(&["Hack", "FiraCode", "Meslo", "Agave"]);
        let installed = set(&["FiraCode", "Agave"]);

        let offer = offerable(&all, &installed, false, false);

        assert_eq!(offer.fonts, names(&["Hack", "Meslo"]));
        assert!(!offer.clear_installed);
        assert!(offer.fonts.iter().all(|f| !installed.contains(f)));
    }

    #[test]
    fn empty_record_offers_everything() {
        let all = names(&["Zed", "Agave", "Hack"]);
        let offer = offerable(&all, &BTreeSet::new(), false, false);
        assert_eq!(offer.fonts, all);
    }

    #[test]
    fn stale_or_force_offers_everything_and_requests_reset() {
        let all = names(&["Hack", "FiraCode"]);
        let installed = set(&["Hack", "FiraCode"]);

        for (stale, force) in [(true, false), (false, true), (true, true)] {
            let offer = offerable(&all, &installed, stale, force);
            assert_eq!(offer.fonts, all);
            assert!(offer.clear_installed);
        }
    }

    #[test]
    fn names_match_exactly() {
        let all = names(&["Hack", "hack"]);
        let offer = offerable(&all, &set(&["Hack"]), false, false);
        assert_eq!(offer.fonts, names(&["hack"]));
    }
}
