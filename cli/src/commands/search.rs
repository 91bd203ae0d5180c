//! One-shot search command

use anyhow::Result;
use tracing::info;

use super::{build_coordinator, DEFAULT_RECENT_LIMIT};
use crate::config::CliConfigLoader;
use crate::output::ViewRenderer;

/// Search once and print every section with page URLs
pub async fn search_command(
    query: String,
    config_loader: CliConfigLoader,
    clear_cache: bool,
) -> Result<()> {
    let config = config_loader.load().await?;
    info!("🔎 Searching {} for {:?}", config.project, query);

    let mut coordinator = build_coordinator(&config, clear_cache).await?;
    coordinator.start().await;
    coordinator.set_query(query);
    coordinator.settle().await;

    let renderer = ViewRenderer::new(&config)
        .with_urls(true)
        .with_max_recent(DEFAULT_RECENT_LIMIT);
    print!("{}", renderer.render(&coordinator.view()));

    Ok(())
}
