use clap::Parser;
use colored::Colorize;
use fontpick_cli::{exit_code_for_clap_error, run_cli, Cli};
use fontpick_core::config::Logging;

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose {
        "debug".to_string()
    } else {
        Logging::from_env()
            .map(|logging| logging.level)
            .unwrap_or_else(|_| Logging::minimal().level)
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = exit_code_for_clap_error(err.kind());
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_logging(&cli);

    if let Err(e) = run_cli(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
