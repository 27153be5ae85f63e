//! termadmin - CodeSystem concept editor
//!
//! Edits the concept hierarchy of FHIR CodeSystems kept as JSON files.

mod commands;
mod config;
mod logging;

use anyhow::Context;
use clap::Parser;
use termadmin_concept_tree::JsonFileStore;

use crate::commands::Command;
use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "termadmin", version)]
#[command(about = "Edit FHIR CodeSystem concept hierarchies")]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    cli.config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&cli.config.logging).context("Failed to initialize logging")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %cli.config.data_dir.display(),
        "Starting termadmin"
    );

    let mut store = JsonFileStore::open(&cli.config.data_dir).with_context(|| {
        format!(
            "Failed to open data directory {}",
            cli.config.data_dir.display()
        )
    })?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli.command, &mut store, cli.config.indent, &mut out)
}
