//! CLI command implementations

pub mod interactive;
pub mod recent;
pub mod search;

pub use interactive::interactive_command;
pub use recent::recent_command;
pub use search::search_command;

use anyhow::Result;
use scrap_core::{PageCache, ProjectConfig, ScrapboxClient, SearchCoordinator};
use std::sync::Arc;
use tracing::{debug, info};

/// Number of recent pages listed when the caller gives no limit
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Build a coordinator for the configured project
pub async fn build_coordinator(
    config: &ProjectConfig,
    clear_cache: bool,
) -> Result<SearchCoordinator> {
    let client = ScrapboxClient::new(config)?;

    let cache = match &config.cache_dir {
        Some(dir) => PageCache::in_dir(dir),
        None => PageCache::default(),
    };
    debug!("📁 Page cache: {}", cache.path().display());

    if clear_cache {
        cache.clear().await?;
        info!("🧹 Cleared page cache");
    }

    Ok(SearchCoordinator::new(
        Arc::new(client),
        cache,
        config.debounce(),
    ))
}
