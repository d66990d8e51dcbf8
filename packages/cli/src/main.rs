//! Hellion Explorer command-line binary
//!
//! # Usage
//!
//! ```bash
//! # Outline of the solar system, three levels deep
//! hellion-explorer --save ship.save --data-dir Data tree --view solar --depth 3
//!
//! # Search the Game Data view by path
//! hellion-explorer --save ship.save --data-dir Data search "Ships > " --by-path
//! ```
//!
//! # Environment Variables
//!
//! - `HELLION_*`: configuration overrides (see `ExplorerConfig`)
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hellion_cli::commands::{render_search, render_stats, render_tree, ViewArg};
use hellion_cli::{load_config, load_sources};
use hellion_core::GameSession;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hellion-explorer")]
#[command(about = "Browse and search HELLION save data")]
struct Cli {
    /// Path to the save file
    #[arg(long)]
    save: PathBuf,
    /// Directory holding the static data JSON files
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Configuration file (default: ~/.hellion-explorer/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a view as an outline
    Tree {
        #[arg(long, value_enum, default_value = "solar")]
        view: ViewArg,
        /// Levels below the root to print
        #[arg(long, default_value = "2")]
        depth: usize,
        /// Print JSON instead of an outline
        #[arg(long)]
        json: bool,
    },
    /// Search a view and print the path of every hit
    Search {
        query: String,
        #[arg(long, value_enum, default_value = "data")]
        view: ViewArg,
        #[arg(long)]
        match_case: bool,
        /// Match against the full node path
        #[arg(long)]
        by_path: bool,
    },
    /// Print node counts and build diagnostics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Commands::Search {
        match_case, by_path, ..
    } = &cli.command
    {
        config.search.match_case |= *match_case;
        config.search.by_path |= *by_path;
    }

    let sources = load_sources(&cli.save, cli.data_dir.as_deref()).await?;
    let mut session = GameSession::open(config, sources)
        .with_context(|| format!("Failed to open {}", cli.save.display()))?;

    let output = match cli.command {
        Commands::Tree { view, depth, json } => render_tree(&session, view.into(), depth, json)?,
        Commands::Search { query, view, .. } => render_search(&mut session, view.into(), &query)?,
        Commands::Stats => render_stats(&session)?,
    };
    print!("{}", output);

    Ok(())
}
