// Entrypoint for the CLI application.
// - Keeps `main` small: load config, generate the session name and hand
//   the file list to the upload loop.
// - Config problems abort before any file is touched; per-file problems
//   are reported by the loop and only change the exit code.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use up::cli::Cli;
use up::name::NameGenerator;
use up::output::Console;
use up::transfer::RsyncTransferer;
use up::{config, upload};

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing();

    let mut console = Console::stdio();

    let config = match config::load_default() {
        Ok(config) => config,
        Err(err) => {
            console.error(&err)?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let session = NameGenerator::system().session();
    let mut rsync = RsyncTransferer::default();
    let report = upload::run(&cli.files, &config, &session, &mut rsync, &mut console);
    Ok(report.exit_code())
}

/// Diagnostics go to stderr, filtered by `UP_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("UP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::IsTerminal::is_terminal(&std::io::stderr()))
        .init();
}
