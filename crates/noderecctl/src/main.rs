//! Noderec Control - CLI for seismic-node repair reconciliation
//!
//! Runs the padding and digest flows against the mounted survey volumes and
//! renders every outcome as a distinct status line. Exit codes distinguish
//! the failure classes; see `errors`.

mod commands;
mod errors;
mod logging;
mod render;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use noderec_common::SiteConfig;
use tracing::Level;

#[derive(Parser)]
#[command(name = "noderecctl")]
#[command(about = "Seismic node repair reconciliation", long_about = None)]
#[command(version)]
struct Cli {
    /// Site configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the discovery search root
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect padded intervals for a node and record them in the shared ledgers
    Padding {
        /// Node serial number
        serial: String,

        /// Resolve and report without writing the ledgers
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse a repair report and append its digest record
    Digest {
        /// Repair report file
        report: PathBuf,
    },
}

fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(SiteConfig::system_path);
    let mut config = SiteConfig::load(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    if let Some(root) = &cli.root {
        config.search_root = root.clone();
    }
    Ok(config)
}

fn main() {
    let started = Instant::now();
    let cli = Cli::parse();

    // Status lines go to stdout; diagnostics stay on stderr
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            render::failure(&format!("{err:#}"));
            logging::record("config", &[], errors::EXIT_GENERAL_ERROR, started);
            std::process::exit(errors::EXIT_GENERAL_ERROR);
        }
    };

    let (name, args, code) = match &cli.command {
        Commands::Padding { serial, dry_run } => (
            "padding",
            vec![serial.clone()],
            commands::padding(&config, serial, *dry_run),
        ),
        Commands::Digest { report } => (
            "digest",
            vec![report.display().to_string()],
            commands::digest(&config, report),
        ),
    };

    logging::record(name, &args, code, started);
    std::process::exit(code);
}
