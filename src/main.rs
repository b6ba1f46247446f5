use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    sessionize_sync::logging::init().context("init logging")?;

    let cli = sessionize_sync::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        sessionize_sync::cli::Command::Sync(args) => {
            sessionize_sync::sync::run(args).context("sync")?;
        }
        sessionize_sync::cli::Command::Extract(args) => {
            sessionize_sync::sync::extract(args).context("extract")?;
        }
        sessionize_sync::cli::Command::Render(args) => {
            sessionize_sync::sync::render(args).context("render")?;
        }
    }

    Ok(())
}
