//! Integration tests for fontpick-core

#[cfg(test)]
mod integration_tests {
    use crate::catalog::{reset_installed_if_needed, sync_catalog, sync_release};
    use crate::cleanup::{cleanup_archives, CleanupOutcome};
    use crate::selection::{parse_direct_names, parse_menu_selection, validate_direct};
    use crate::{
        archive_path, ArchiveExtractor, CatalogSource, FontpickError, FontpickResult,
        InstallPipeline, InstalledStore, MemoryInstalledStore, MenuChoice, ReleaseCache,
        Selection, SessionFlags,
    };
    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Remote source serving a fixed catalog and recording downloads
    struct FakeSource {
        release: String,
        fonts: Vec<String>,
        broken_downloads: BTreeSet<String>,
        downloads: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(release: &str, fonts: &[&str]) -> Self {
            Self {
                release: release.to_string(),
                fonts: fonts.iter().map(|s| s.to_string()).collect(),
                broken_downloads: BTreeSet::new(),
                downloads: RefCell::new(Vec::new()),
            }
        }

        fn failing_download(mut self, name: &str) -> Self {
            self.broken_downloads.insert(name.to_string());
            self
        }
    }

    impl CatalogSource for FakeSource {
        fn fetch_release(&self) -> FontpickResult<String> {
            Ok(self.release.clone())
        }

        fn fetch_all_fonts(&self) -> FontpickResult<Vec<String>> {
            Ok(self.fonts.clone())
        }

        fn font_archive_exists(&self, release: &str, name: &str) -> bool {
            release == self.release && self.fonts.iter().any(|f| f == name)
        }

        fn download_archive(&self, _release: &str, name: &str, dest: &Path) -> FontpickResult<()> {
            self.downloads.borrow_mut().push(name.to_string());
            if self.broken_downloads.contains(name) {
                return Err(FontpickError::DownloadFailed {
                    font: name.to_string(),
                    reason: "HTTP 404".to_string(),
                });
            }
            fs::write(dest, name.as_bytes())?;
            Ok(())
        }
    }

    /// Writes one font file named after the archive
    struct FakeExtractor;

    impl ArchiveExtractor for FakeExtractor {
        fn extract(&self, archive: &Path, dest: &Path) -> FontpickResult<()> {
            let stem = archive.file_stem().and_then(|s| s.to_str()).unwrap_or("font");
            fs::create_dir_all(dest)?;
            fs::write(dest.join(format!("{stem}-Regular.ttf")), b"font")?;
            Ok(())
        }
    }

    struct Dirs {
        _temp: TempDir,
        cache: ReleaseCache,
        downloads: std::path::PathBuf,
        install: std::path::PathBuf,
    }

    fn dirs() -> Dirs {
        let temp = TempDir::new().unwrap();
        let cache = ReleaseCache::in_dir(&temp.path().join("cache"));
        let downloads = temp.path().join("downloads");
        let install = temp.path().join("fonts");
        Dirs {
            _temp: temp,
            cache,
            downloads,
            install,
        }
    }

    #[test]
    fn first_sync_is_stale_and_persists_release() {
        let d = dirs();
        let source = FakeSource::new("v3.2.1", &["Hack"]);

        let state = sync_release(&source, &d.cache, &SessionFlags::default()).unwrap();
        assert!(state.stale);
        assert_eq!(state.previous, None);
        assert_eq!(d.cache.read_cached_release().unwrap().as_deref(), Some("v3.2.1"));

        let again = sync_release(&source, &d.cache, &SessionFlags::default()).unwrap();
        assert!(!again.stale);
    }

    #[test]
    fn dry_run_sync_does_not_write_release() {
        let d = dirs();
        let source = FakeSource::new("v3.2.1", &["Hack"]);
        let flags = SessionFlags::new(false, false, true);

        let state = sync_release(&source, &d.cache, &flags).unwrap();
        assert!(state.stale);
        assert_eq!(d.cache.read_cached_release().unwrap(), None);
    }

    #[test]
    fn current_release_filters_installed_fonts() {
        let d = dirs();
        d.cache.write_cached_release("v3.2.1").unwrap();
        let source = FakeSource::new("v3.2.1", &["Agave", "Hack", "Meslo"]);
        let store = MemoryInstalledStore::with_names(["Hack"]);

        let state = sync_catalog(&source, &d.cache, &store, SessionFlags::default()).unwrap();

        assert!(!state.flags.stale);
        assert_eq!(state.offerable, vec!["Agave".to_string(), "Meslo".to_string()]);
        assert_eq!(store.entries(), vec!["Hack".to_string()]);
    }

    #[test]
    fn stale_release_offers_all_and_clears_record() {
        let d = dirs();
        d.cache.write_cached_release("v3.1.0").unwrap();
        let source = FakeSource::new("v3.2.1", &["Agave", "Hack"]);
        let store = MemoryInstalledStore::with_names(["Hack"]);

        let state = sync_catalog(&source, &d.cache, &store, SessionFlags::default()).unwrap();

        assert!(state.flags.stale);
        assert_eq!(state.offerable, state.all);
        assert!(state.previously_installed.contains("Hack"));
        assert!(store.entries().is_empty());
        assert_eq!(d.cache.read_cached_release().unwrap().as_deref(), Some("v3.2.1"));
    }

    #[test]
    fn force_offers_all_even_when_current() {
        let d = dirs();
        d.cache.write_cached_release("v3.2.1").unwrap();
        let source = FakeSource::new("v3.2.1", &["Agave", "Hack"]);
        let store = MemoryInstalledStore::with_names(["Agave", "Hack"]);

        let flags = SessionFlags::new(true, false, false);
        let state = sync_catalog(&source, &d.cache, &store, flags).unwrap();

        assert_eq!(state.offerable, vec!["Agave".to_string(), "Hack".to_string()]);
        assert!(store.entries().is_empty());
    }

    #[test]
    fn reset_policy_only_clears_on_refresh() {
        let store = MemoryInstalledStore::with_names(["Hack"]);
        let before = reset_installed_if_needed(&store, &SessionFlags::default()).unwrap();
        assert!(before.contains("Hack"));
        assert_eq!(store.entries(), vec!["Hack".to_string()]);

        let flags = SessionFlags::default().with_stale(true);
        reset_installed_if_needed(&store, &flags).unwrap();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn menu_selection_feeds_pipeline() {
        let d = dirs();
        let source = FakeSource::new("v3.2.1", &["Agave", "FiraCode", "Hack", "Meslo", "Ubuntu"]);
        let store = MemoryInstalledStore::new();
        let state = sync_catalog(&source, &d.cache, &store, SessionFlags::default()).unwrap();

        let selection = match parse_menu_selection("1,3-4", &state.offerable).unwrap() {
            MenuChoice::Fonts(selection) => selection,
            MenuChoice::Quit => panic!("unexpected quit"),
        };

        let pipeline = InstallPipeline::new(
            &source,
            &FakeExtractor,
            &store,
            d.downloads.clone(),
            d.install.clone(),
        );
        let report = pipeline.run(&state.release.release, &selection, &state.flags).unwrap();

        assert_eq!(report.installed.len(), 3);
        assert_eq!(
            store.entries(),
            vec!["Agave".to_string(), "Hack".to_string(), "Meslo".to_string()]
        );
        assert!(d.install.join("Hack").join("Hack-Regular.ttf").exists());
        assert_eq!(report.font_files().len(), 3);
    }

    #[test]
    fn failed_download_is_isolated_and_cleanup_still_runs() {
        let d = dirs();
        let source = FakeSource::new("v3.2.1", &["FontA", "FontB"]).failing_download("FontA");
        let store = MemoryInstalledStore::new();
        let selection = Selection::new(["FontA", "FontB"]);

        let pipeline = InstallPipeline::new(
            &source,
            &FakeExtractor,
            &store,
            d.downloads.clone(),
            d.install.clone(),
        );
        let report = pipeline
            .run("v3.2.1", &selection, &SessionFlags::default())
            .unwrap();

        assert_eq!(*source.downloads.borrow(), vec!["FontA".to_string(), "FontB".to_string()]);
        assert_eq!(store.entries(), vec!["FontB".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "FontA");
        assert!(!report.all_failed());

        let outcome =
            cleanup_archives(&d.downloads, &selection, false, report.any_installed()).unwrap();
        assert_eq!(outcome, CleanupOutcome::Removed(1));
        assert!(!archive_path(&d.downloads, "FontB").exists());
    }

    #[test]
    fn leftover_archive_is_replaced_and_existing_install_overwritten() {
        let d = dirs();
        fs::create_dir_all(&d.downloads).unwrap();
        fs::write(archive_path(&d.downloads, "Hack"), b"stale").unwrap();
        let old = d.install.join("Hack");
        fs::create_dir_all(&old).unwrap();
        fs::write(old.join("Obsolete.ttf"), b"old").unwrap();

        let source = FakeSource::new("v3.2.1", &["Hack"]);
        let store = MemoryInstalledStore::new();
        let pipeline = InstallPipeline::new(
            &source,
            &FakeExtractor,
            &store,
            d.downloads.clone(),
            d.install.clone(),
        );
        let flags = SessionFlags::new(false, true, false);
        pipeline.run("v3.2.1", &Selection::new(["Hack"]), &flags).unwrap();

        assert_eq!(fs::read(archive_path(&d.downloads, "Hack")).unwrap(), b"Hack");
        assert!(!old.join("Obsolete.ttf").exists());
        assert!(old.join("Hack-Regular.ttf").exists());
    }

    #[test]
    fn dry_run_pipeline_touches_nothing() {
        let d = dirs();
        let source = FakeSource::new("v3.2.1", &["Hack"]);
        let store = MemoryInstalledStore::new();
        let pipeline = InstallPipeline::new(
            &source,
            &FakeExtractor,
            &store,
            d.downloads.clone(),
            d.install.clone(),
        );

        let flags = SessionFlags::new(false, false, true);
        let report = pipeline.run("v3.2.1", &Selection::new(["Hack"]), &flags).unwrap();

        assert_eq!(report.planned, vec!["Hack".to_string()]);
        assert_eq!(report.attempted, 0);
        assert!(source.downloads.borrow().is_empty());
        assert!(store.read_all().unwrap().is_empty());
        assert!(!d.downloads.exists());
    }

    #[test]
    fn direct_validation_is_all_or_nothing() {
        let source = FakeSource::new("v3.2.1", &["FontA"]);
        let names = parse_direct_names("FontA,FontB");

        let err = validate_direct(&names, &source, "v3.2.1").unwrap_err();

        assert!(matches!(err, FontpickError::UnknownFontName(name) if name == "FontB"));
        assert!(source.downloads.borrow().is_empty());
    }

    #[test]
    fn direct_validation_accepts_known_names() {
        let source = FakeSource::new("v3.2.1", &["FontA", "FontB"]);
        let names = parse_direct_names("FontB, FontA");

        let selection = validate_direct(&names, &source, "v3.2.1").unwrap();
        assert_eq!(selection.fonts(), &["FontB".to_string(), "FontA".to_string()]);
    }

    #[test]
    fn direct_validation_rejects_path_like_names_before_probing() {
        let source = FakeSource::new("v3.2.1", &["FontA", ".."]);
        let names = parse_direct_names("FontA,..");

        let err = validate_direct(&names, &source, "v3.2.1").unwrap_err();

        assert!(matches!(err, FontpickError::UnknownFontName(name) if name == ".."));
    }

    #[test]
    fn pipeline_refuses_names_that_escape_install_dir() {
        let d = dirs();
        let sibling = d.install.parent().unwrap().join("keep.txt");
        fs::write(&sibling, b"data").unwrap();

        let source = FakeSource::new("v3.2.1", &["..", "Hack"]);
        let store = MemoryInstalledStore::new();
        let pipeline = InstallPipeline::new(
            &source,
            &FakeExtractor,
            &store,
            d.downloads.clone(),
            d.install.clone(),
        );
        let report = pipeline
            .run("v3.2.1", &Selection::new(["..", "Hack"]), &SessionFlags::default())
            .unwrap();

        assert!(sibling.exists());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "..");
        assert_eq!(store.entries(), vec!["Hack".to_string()]);
        assert_eq!(*source.downloads.borrow(), vec!["Hack".to_string()]);
    }

    #[test]
    fn error_messages_carry_suggestions() {
        let error = FontpickError::UnknownFontName("Nope".to_string());
        assert!(error.to_string().contains("Unknown font name: Nope"));
        assert!(error.to_string().contains("Suggestion"));
    }
}
