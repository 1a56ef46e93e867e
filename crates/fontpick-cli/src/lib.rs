//! CLI interface for fontpick
//!
//! Resolves the flags into one action, runs the pre-flight checks and wires
//! the GitHub catalog, zip extractor and on-disk installed record into the
//! command handlers.

pub mod args;
pub mod hooks;
pub mod ops;
pub mod prompt;


pub use args::{exit_code_for_clap_error, Action, Cli, Commands};
pub use ops::{
    handle_activate, handle_direct_install, handle_list, handle_menu_install, handle_uninstall,
    handle_update, render_installed, run_install, write_completions, MenuOutcome, OutputOptions,
    Session,
};

use fontpick_core::config::FontpickConfig;
use fontpick_core::{FontActivator, FontpickError, SessionFlags};
use fontpick_remote::{GithubCatalog, ZipExtractor};
use hooks::{check_dependencies, is_termux, FontCache, TermuxActivator};
use std::io;

/// Host collaborators that passed the pre-flight checks
#[derive(Debug, Default)]
pub struct Preflight {
    pub font_cache: Option<FontCache>,
    pub activator: Option<TermuxActivator>,
}

/// Check external commands before anything touches the network.
///
/// Only actions that change installed fonts refresh the font cache, and dry
/// runs never do.
pub fn preflight(cli: &Cli) -> Result<Preflight, FontpickError> {
    let changes_fonts = !matches!(cli.action(), Action::List | Action::Completions(_));
    let font_cache = if cli.dry_run || !changes_fonts {
        None
    } else {
        FontCache::for_platform()
    };
    if let Some(cache) = &font_cache {
        check_dependencies(&[cache.command()])?;
    }

    let activator = if cli.activate {
        if !is_termux() {
            return Err(FontpickError::UnsupportedOperation(
                "--activate is only available inside Termux".to_string(),
            ));
        }
        let activator = TermuxActivator::for_home()?;
        check_dependencies(&activator.required_commands())?;
        Some(activator)
    } else {
        None
    };

    Ok(Preflight {
        font_cache,
        activator,
    })
}

/// Main CLI handler
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    let output = OutputOptions::new(cli.quiet, cli.verbose, cli.json);
    let action = cli.action();

    if let Action::Completions(shell) = action {
        write_completions(shell, io::stdout())?;
        return Ok(());
    }

    let config = FontpickConfig::from_env()?;
    config.validate()?;
    log::debug!(
        "Install dir {}, download dir {}, cache dir {}",
        config.paths.install_dir.display(),
        config.paths.download_dir.display(),
        config.paths.cache_dir.display()
    );

    let hooks = preflight(&cli)?;
    let store = config.installed_store();

    let mut quit = false;
    match &action {
        Action::List => handle_list(&store, &output)?,
        Action::Uninstall(names) => {
            let removed = handle_uninstall(
                &store,
                &config.paths.install_dir,
                names,
                cli.dry_run,
                &output,
            )?;
            if !removed.is_empty() {
                if let Some(cache) = &hooks.font_cache {
                    if let Err(e) = cache.refresh(&config.paths.install_dir) {
                        ops::log_warning(&format!("Font cache refresh failed: {e}"));
                    }
                }
            }
        }
        Action::Menu | Action::Direct(_) | Action::Update => {
            let source = GithubCatalog::new(&config.remote)?;
            let extractor = ZipExtractor;
            let flags = SessionFlags::new(cli.force, cli.keep_archives, cli.dry_run);
            let session = Session::new(&config, &source, &extractor, &store, flags, output)
                .with_font_cache(hooks.font_cache.clone());

            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut out = io::stdout();
            let mut err = io::stderr();

            match action {
                Action::Menu => {
                    quit = handle_menu_install(&session, &mut input, &mut out, &mut err)?
                        .ends_session();
                }
                Action::Direct(ref names) => {
                    handle_direct_install(&session, names)?;
                }
                _ => {
                    handle_update(&session)?;
                }
            }
        }
        Action::Completions(_) => {}
    }

    if quit {
        return Ok(());
    }

    if let Some(activator) = &hooks.activator {
        let stdin = io::stdin();
        handle_activate(
            activator,
            config.paths.install_dir.clone(),
            &mut stdin.lock(),
            &mut io::stdout(),
            &mut io::stderr(),
            &output,
        )?;
    }

    Ok(())
}
