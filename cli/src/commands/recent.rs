//! Recently accessed pages command

use anyhow::Result;

use super::build_coordinator;
use crate::config::CliConfigLoader;
use crate::output::ViewRenderer;

/// Refresh the page cache and print the most recently accessed pages
pub async fn recent_command(
    limit: usize,
    config_loader: CliConfigLoader,
    clear_cache: bool,
) -> Result<()> {
    let config = config_loader.load().await?;

    let mut coordinator = build_coordinator(&config, clear_cache).await?;
    coordinator.start().await;
    coordinator.settle().await;

    let renderer = ViewRenderer::new(&config)
        .with_urls(true)
        .with_max_recent(limit);
    print!("{}", renderer.render(&coordinator.view()));

    Ok(())
}
