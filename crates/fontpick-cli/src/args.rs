use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Nerd Fonts installer
#[derive(Parser)]
#[command(name = "fontpick")]
#[command(about = "Pick, download and install fonts from the latest Nerd Fonts release", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Offer and reinstall fonts that are already installed
    #[arg(short, long, help = "Reinstall fonts even if they are already installed")]
    pub force: bool,

    /// Leave downloaded archives in the download directory
    #[arg(short, long, help = "Keep downloaded archives after installing")]
    pub keep_archives: bool,

    /// Install fonts by name instead of using the menu
    #[arg(
        short,
        long,
        value_name = "FONTS",
        help = "Comma-separated font names to install without the menu",
        conflicts_with_all = ["list", "uninstall", "update"]
    )]
    pub install: Option<String>,

    /// List installed fonts
    #[arg(
        short = 'L',
        long,
        help = "List installed fonts",
        conflicts_with_all = ["uninstall", "update"]
    )]
    pub list: bool,

    /// Remove installed fonts
    #[arg(
        short,
        long,
        value_name = "FONTS",
        help = "Comma-separated font names to uninstall",
        conflicts_with = "update"
    )]
    pub uninstall: Option<String>,

    /// Reinstall every installed font when a new release is out
    #[arg(short = 'U', long, help = "Update installed fonts to the latest release")]
    pub update: bool,

    /// Choose an installed font file as the terminal font (Termux)
    #[arg(short, long, help = "Pick an installed font as the terminal font afterwards")]
    pub activate: bool,

    /// Simulate actions without changing anything
    #[arg(
        global = true,
        long,
        help = "Print intended actions without downloading or writing"
    )]
    pub dry_run: bool,

    /// Reduce output to errors only
    #[arg(
        global = true,
        long,
        help = "Silence routine status output",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Show additional status output
    #[arg(
        global = true,
        long,
        help = "Show verbose status messages",
        conflicts_with = "quiet"
    )]
    pub verbose: bool,

    /// Output as JSON
    #[arg(global = true, long, help = "Output results as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        /// Target shell (bash, zsh, fish, powershell, elvish)
        #[arg(value_enum, help = "Shell to generate completions for")]
        shell: Shell,
    },
}

/// What one invocation does, resolved from the flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Menu,
    Direct(String),
    List,
    Uninstall(String),
    Update,
    Completions(Shell),
}

impl Cli {
    pub fn action(&self) -> Action {
        if let Some(Commands::Completions { shell }) = &self.command {
            return Action::Completions(*shell);
        }
        if self.list {
            return Action::List;
        }
        if let Some(names) = &self.uninstall {
            return Action::Uninstall(names.clone());
        }
        if self.update {
            return Action::Update;
        }
        match &self.install {
            Some(names) => Action::Direct(names.clone()),
            None => Action::Menu,
        }
    }
}

/// Map clap error kinds to exit codes (0 for help/version, 1 for other errors)
pub fn exit_code_for_clap_error(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}
