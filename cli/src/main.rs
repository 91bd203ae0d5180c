//! # scrap CLI
//!
//! Command-line interface for scrap - incremental search over a Scrapbox project.
//!
//! ## Usage
//!
//! - `scrap` - Start interactive mode
//! - `scrap search "query"` - Search once and print the results
//! - `scrap recent` - Show recently accessed pages
//!
//! Recently accessed pages are cached locally, so results show up instantly
//! and stay available when the network is slow or gone.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod output;

use commands::{interactive_command, recent_command, search_command, DEFAULT_RECENT_LIMIT};
use config::CliConfigLoader;

/// scrap - Incremental search over a Scrapbox project
#[derive(Parser)]
#[command(name = "scrap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search and open Scrapbox pages from the terminal")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Project name override
    #[arg(long, env = "SCRAP_PROJECT")]
    project: Option<String>,

    /// Session token override (value of the connect.sid cookie)
    #[arg(long, env = "SCRAP_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Base URL override
    #[arg(long, env = "SCRAP_BASE_URL")]
    base_url: Option<String>,

    /// Debounce interval override in milliseconds
    #[arg(long, env = "SCRAP_DEBOUNCE_MS")]
    debounce_ms: Option<u64>,

    /// Page cache directory override
    #[arg(long, env = "SCRAP_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Drop the cached recent pages before starting
    #[arg(long)]
    clear_cache: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search once and print the results
    Search {
        /// Query text, sent exactly as typed
        query: String,
    },

    /// Show recently accessed pages
    Recent {
        /// Maximum number of pages to list
        #[arg(short, long, default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(project) = &cli.project {
        loader = loader.with_project_override(project.clone());
    }

    if let Some(token) = &cli.token {
        loader = loader.with_token_override(token.clone());
    }

    if let Some(base_url) = &cli.base_url {
        loader = loader.with_base_url_override(base_url.clone());
    }

    if let Some(debounce_ms) = cli.debounce_ms {
        loader = loader.with_debounce_override(debounce_ms);
    }

    if let Some(cache_dir) = &cli.cache_dir {
        loader = loader.with_cache_dir_override(cache_dir.clone());
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        scrap_core::init_tracing_with_debug(true);
    } else if std::env::var_os("RUST_LOG").is_some() {
        scrap_core::init_tracing();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
            .with_writer(std::io::stderr)
            .init();
    }

    // Build configuration loader
    let config_loader = build_config_loader(&cli);

    match cli.command {
        Some(Commands::Search { query }) => {
            search_command(query, config_loader, cli.clear_cache).await
        }
        Some(Commands::Recent { limit }) => {
            recent_command(limit, config_loader, cli.clear_cache).await
        }
        // Default to interactive mode
        None => interactive_command(config_loader, cli.clear_cache).await,
    }
}
