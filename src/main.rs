use std::fs::OpenOptions;
use std::sync::Mutex;

use clap::Parser;
use tdx::cli::commands::Cli;
use tdx::cli::handlers;
use tracing_subscriber::EnvFilter;

/// Logs go to `--log-file` when given. Otherwise the CLI logs to stderr
/// (quiet unless RUST_LOG says otherwise) and the TUI logs nowhere, since
/// stderr is the screen.
fn init_logging(cli: &Cli) -> std::io::Result<()> {
    if let Some(path) = &cli.log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tdx=debug")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else if cli.command.is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli) {
        eprintln!("error: cannot open log file: {}", e);
        std::process::exit(1);
    }

    // No subcommand → launch TUI
    let result = if cli.command.is_none() {
        tdx::tui::run(&cli)
    } else {
        handlers::dispatch(cli)
    };
    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
