use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use fontpick_core::activate::{FsEntrySource, TreeCursor};
use fontpick_core::catalog::{reset_installed_if_needed, sync_catalog, sync_release};
use fontpick_core::cleanup::{cleanup_archives, CleanupOutcome};
use fontpick_core::config::FontpickConfig;
use fontpick_core::selection::{ensure_font_names, parse_direct_names, validate_direct};
use fontpick_core::validation::inspect_font_file;
use fontpick_core::{
    ArchiveExtractor, CatalogSource, FontActivator, FontpickError, FontpickResult,
    InstallPipeline, InstallReport, InstalledStore, MenuChoice, ReleaseCache, Selection,
    SessionFlags,
};
use serde_json::to_string_pretty;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::args::Cli;
use crate::hooks::FontCache;
use crate::prompt;

/// Output controls for CLI commands
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub quiet: bool,
    pub verbose: bool,
    pub json: bool,
}

impl OutputOptions {
    pub fn new(quiet: bool, verbose: bool, json: bool) -> Self {
        Self {
            quiet,
            verbose,
            json,
        }
    }

    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    pub fn should_print_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }
}

pub(crate) fn log_status(opts: &OutputOptions, message: &str) {
    if opts.should_print() {
        println!("{}", message);
    }
}

pub(crate) fn log_verbose(opts: &OutputOptions, message: &str) {
    if opts.should_print_verbose() {
        eprintln!("{}", message);
    }
}

pub(crate) fn log_success(opts: &OutputOptions, message: &str) {
    if opts.should_print() {
        println!("{} {}", "✓".green(), message.green());
    }
}

pub(crate) fn log_warning(message: &str) {
    eprintln!("{} {}", "!".yellow(), message.yellow());
}

pub(crate) fn log_failure(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}

/// Collaborators and settings for one install-type invocation
pub struct Session<'a> {
    pub source: &'a dyn CatalogSource,
    pub extractor: &'a dyn ArchiveExtractor,
    pub store: &'a dyn InstalledStore,
    pub release_cache: ReleaseCache,
    pub download_dir: PathBuf,
    pub install_dir: PathBuf,
    pub flags: SessionFlags,
    pub output: OutputOptions,
    /// Run after at least one font was installed
    pub font_cache: Option<FontCache>,
}

impl<'a> Session<'a> {
    pub fn new(
        config: &FontpickConfig,
        source: &'a dyn CatalogSource,
        extractor: &'a dyn ArchiveExtractor,
        store: &'a dyn InstalledStore,
        flags: SessionFlags,
        output: OutputOptions,
    ) -> Self {
        Self {
            source,
            extractor,
            store,
            release_cache: config.release_cache(),
            download_dir: config.paths.download_dir.clone(),
            install_dir: config.paths.install_dir.clone(),
            flags,
            output,
            font_cache: None,
        }
    }

    pub fn with_font_cache(mut self, font_cache: Option<FontCache>) -> Self {
        self.font_cache = font_cache;
        self
    }
}

/// Generate shell completion script for the given shell
pub fn write_completions<W: Write>(shell: Shell, mut writer: W) -> Result<(), FontpickError> {
    let mut command = Cli::command();
    let bin_name = command.get_name().to_string();

    generate(shell, &mut command, bin_name.as_str(), &mut writer);

    Ok(())
}

/// How an interactive menu session ended
#[derive(Debug)]
pub enum MenuOutcome {
    /// The user entered the quit token or closed input
    Quit,
    /// Every catalog font is already installed
    NothingToOffer,
    Installed(InstallReport),
}

impl MenuOutcome {
    /// Quitting ends the program; nothing else runs afterwards
    pub fn ends_session(&self) -> bool {
        matches!(self, MenuOutcome::Quit)
    }
}

/// Handle the interactive menu
pub fn handle_menu_install<R, W, E>(
    session: &Session<'_>,
    input: &mut R,
    out: &mut W,
    err: &mut E,
) -> FontpickResult<MenuOutcome>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let state = sync_catalog(
        session.source,
        &session.release_cache,
        session.store,
        session.flags,
    )?;
    log_verbose(
        &session.output,
        &format!(
            "Release {} ({} fonts, {} offered)",
            state.release.release,
            state.all.len(),
            state.offerable.len()
        ),
    );

    if state.offerable.is_empty() {
        log_status(
            &session.output,
            "All fonts are already installed. Use --force to reinstall.",
        );
        return Ok(MenuOutcome::NothingToOffer);
    }

    match prompt::choose_fonts(&state.offerable, input, out, err)? {
        MenuChoice::Quit => {
            log_status(&session.output, "Goodbye!");
            Ok(MenuOutcome::Quit)
        }
        MenuChoice::Fonts(selection) => {
            run_install(session, &state.release.release, &selection, &state.flags)
                .map(MenuOutcome::Installed)
        }
    }
}

/// Handle `--install A,B`: every name must exist before anything downloads
pub fn handle_direct_install(
    session: &Session<'_>,
    names: &str,
) -> FontpickResult<Option<InstallReport>> {
    let names = parse_direct_names(names);
    if names.is_empty() {
        return Err(FontpickError::NoSelectionMade);
    }

    let release = sync_release(session.source, &session.release_cache, &session.flags)?;
    let flags = session.flags.with_stale(release.stale);

    let selection = validate_direct(&names, session.source, &release.release)?;
    let previously_installed = reset_installed_if_needed(session.store, &flags)?;

    let selection = if flags.refresh_all() {
        selection
    } else {
        let pending = selection.without(&previously_installed);
        for name in selection.iter().filter(|n| !pending.contains(n.as_str())) {
            log_status(
                &session.output,
                &format!("{name} is already installed (use --force to reinstall)"),
            );
        }
        pending
    };

    if selection.is_empty() {
        return Ok(None);
    }

    run_install(session, &release.release, &selection, &flags).map(Some)
}

/// Handle `--update`: reinstall recorded fonts when the release changed
pub fn handle_update(session: &Session<'_>) -> FontpickResult<Option<InstallReport>> {
    let release = sync_release(session.source, &session.release_cache, &session.flags)?;
    let flags = session.flags.with_stale(release.stale);

    if !flags.refresh_all() {
        log_status(
            &session.output,
            &format!("Fonts are up to date (release {}).", release.release),
        );
        return Ok(None);
    }

    let previously_installed = reset_installed_if_needed(session.store, &flags)?;
    if previously_installed.is_empty() {
        log_status(&session.output, "No installed fonts to update.");
        return Ok(None);
    }

    log_status(
        &session.output,
        &format!(
            "Updating {} fonts to {}",
            previously_installed.len(),
            release.release
        ),
    );
    let selection = Selection::new(previously_installed);
    run_install(session, &release.release, &selection, &flags).map(Some)
}

/// Run the pipeline, report each font, then clean up and refresh caches
pub fn run_install(
    session: &Session<'_>,
    release: &str,
    selection: &Selection,
    flags: &SessionFlags,
) -> FontpickResult<InstallReport> {
    if selection.is_empty() {
        return Err(FontpickError::NoSelectionMade);
    }

    log_status(
        &session.output,
        &format!("Installing {} font(s) from {}", selection.len(), release),
    );

    let pipeline = InstallPipeline::new(
        session.source,
        session.extractor,
        session.store,
        session.download_dir.clone(),
        session.install_dir.clone(),
    );
    let report = pipeline.run(release, selection, flags)?;

    for name in &report.planned {
        log_status(
            &session.output,
            &format!(
                "DRY-RUN: would install {} into {}",
                name,
                pipeline.install_dir().join(name).display()
            ),
        );
    }
    for font in &report.installed {
        log_success(
            &session.output,
            &format!("Installed {} ({} files)", font.name, font.files.len()),
        );
    }
    for failure in &report.failed {
        log_failure(&failure.error);
    }

    if !flags.dry_run {
        match cleanup_archives(
            &session.download_dir,
            selection,
            flags.keep_archives,
            report.any_installed(),
        )? {
            CleanupOutcome::Removed(count) => {
                log_verbose(&session.output, &format!("Removed {count} archive(s)"));
            }
            CleanupOutcome::Kept(dir) => {
                log_status(
                    &session.output,
                    &format!("Archives kept in {}", dir.display()),
                );
            }
            CleanupOutcome::Skipped => {}
        }
    }

    if report.any_installed() {
        if let Some(cache) = &session.font_cache {
            if let Err(e) = cache.refresh(&session.install_dir) {
                log_warning(&format!("Font cache refresh failed: {e}"));
            }
        }
    }

    if report.all_failed() {
        return Err(FontpickError::InstallFailed(report.attempted));
    }

    if session.output.json {
        let json = to_string_pretty(&report).map_err(|e| {
            FontpickError::InvalidFormat(format!("Failed to serialize install report: {}", e))
        })?;
        println!("{}", json);
    }

    Ok(report)
}

/// Prepare installed-font listing lines or JSON
pub fn render_installed(store: &dyn InstalledStore, json: bool) -> FontpickResult<String> {
    let names: Vec<String> = store.read_all()?.into_iter().collect();

    if json {
        return to_string_pretty(&names).map_err(|e| {
            FontpickError::InvalidFormat(format!("Failed to serialize font list to JSON: {}", e))
        });
    }
    Ok(names.join("\n"))
}

/// Handle `--list`
pub fn handle_list(store: &dyn InstalledStore, output: &OutputOptions) -> FontpickResult<()> {
    let rendered = render_installed(store, output.json)?;
    if rendered.is_empty() {
        log_status(output, "No fonts installed.");
    } else {
        println!("{}", rendered);
    }
    Ok(())
}

/// Handle `--uninstall A,B`. Names that are not plain font names fail the
/// whole call; names that are not installed are reported and skipped.
/// Returns the names that were removed.
pub fn handle_uninstall(
    store: &dyn InstalledStore,
    install_dir: &Path,
    names: &str,
    dry_run: bool,
    output: &OutputOptions,
) -> FontpickResult<Vec<String>> {
    let names = parse_direct_names(names);
    if names.is_empty() {
        return Err(FontpickError::NoSelectionMade);
    }

    ensure_font_names(&names)?;

    let installed = store.read_all()?;
    let mut removed = Vec::new();

    for name in names {
        let dir = install_dir.join(&name);
        if !installed.contains(&name) && !dir.exists() {
            log_warning(&format!("{name} is not installed"));
            continue;
        }

        if dry_run {
            log_status(
                output,
                &format!("DRY-RUN: would remove {}", dir.display()),
            );
            continue;
        }

        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        store.remove(&name)?;
        log_success(output, &format!("Uninstalled {name}"));
        removed.push(name);
    }

    Ok(removed)
}

/// Browse the install directory and apply the picked font
pub fn handle_activate<R, W, E>(
    activator: &dyn FontActivator,
    install_dir: PathBuf,
    input: &mut R,
    out: &mut W,
    err: &mut E,
    output: &OutputOptions,
) -> FontpickResult<Option<PathBuf>>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let source = FsEntrySource;
    let mut cursor = TreeCursor::new(&source, install_dir)?;

    let Some(picked) = prompt::browse(&mut cursor, input, out, err)? else {
        log_status(output, "No font activated.");
        return Ok(None);
    };

    let face = inspect_font_file(&picked)?;
    activator.apply(&picked)?;
    log_success(
        output,
        &format!("Activated {} {}", face.family_name, face.style),
    );
    Ok(Some(picked))
}
