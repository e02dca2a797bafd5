//! Elemental CLI - find recipe paths from the starting elements

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use elemental_catalog::{CatalogSource, JsonFileCatalog};
use elemental_core::ElementsDatabase;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{completions, config as config_cmd, elements, search, serve};
use config::Config;

#[derive(Parser)]
#[command(name = "elemental")]
#[command(author, version, about = "Recipe path finder for element-combination games")]
pub struct Cli {
    /// Catalog JSON file (element name -> tier and recipes)
    #[arg(short, long, env = "ELEMENTAL_CATALOG", global = true)]
    pub catalog: Option<PathBuf>,

    /// Output format: table, json
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find recipe paths to an element
    Search(search::SearchArgs),
    /// List or look up catalog elements
    Elements(elements::ElementsArgs),
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Manage CLI configuration
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Loaded catalog plus the persisted configuration
pub struct AppContext {
    pub db: Arc<ElementsDatabase>,
    pub config: Config,
}

impl AppContext {
    pub async fn new(cli: &Cli, config: Config) -> anyhow::Result<Self> {
        let path = cli
            .catalog
            .clone()
            .or_else(|| config.catalog.clone())
            .context("No catalog given. Pass --catalog or run `elemental config set catalog <file>`")?;
        tracing::debug!("Using catalog at: {:?}", path);

        let db = JsonFileCatalog::new(&path)
            .load()
            .await
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        if db.skipped_recipes() > 0 {
            tracing::warn!("Skipped {} malformed recipes", db.skipped_recipes());
        }

        Ok(Self {
            db: Arc::new(db),
            config,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting elemental CLI");

    match &cli.command {
        Commands::Config(args) => return config_cmd::run(args),
        Commands::Completions(args) => return completions::run(args),
        _ => {}
    }

    let ctx = AppContext::new(&cli, Config::load()?).await?;

    match &cli.command {
        Commands::Search(args) => search::run(args, &cli, &ctx).await?,
        Commands::Elements(args) => elements::run(args, &cli, &ctx)?,
        Commands::Serve(args) => serve::run(args, &ctx).await?,
        Commands::Config(_) | Commands::Completions(_) => {}
    }

    Ok(())
}
