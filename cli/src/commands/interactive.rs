//! Interactive mode command
//!
//! Every line typed on stdin is the new content of the search box. Lines
//! starting with `:` are commands: `:open N` prints the URL of entry N and
//! `:q` quits.

use anyhow::Result;
use scrap_core::ViewState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use super::{build_coordinator, DEFAULT_RECENT_LIMIT};
use crate::config::CliConfigLoader;
use crate::output::ViewRenderer;

/// A parsed line of interactive input
#[derive(Debug, PartialEq, Eq)]
pub enum InputLine {
    /// New search box content
    Query(String),
    /// Print the URL of the 1-based entry
    Open(usize),
    Quit,
    Unknown(String),
}

/// Parse one line of interactive input
pub fn parse_input(line: &str) -> InputLine {
    let Some(command) = line.strip_prefix(':') else {
        return InputLine::Query(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("q" | "quit"), None) => InputLine::Quit,
        (Some("open" | "o"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => InputLine::Open(n),
            _ => InputLine::Unknown(line.to_string()),
        },
        _ => InputLine::Unknown(line.to_string()),
    }
}

/// Start interactive mode
pub async fn interactive_command(config_loader: CliConfigLoader, clear_cache: bool) -> Result<()> {
    let config = config_loader.load().await?;
    let coordinator = build_coordinator(&config, clear_cache).await?;
    let renderer = ViewRenderer::new(&config).with_max_recent(DEFAULT_RECENT_LIMIT);

    let (query_tx, query_rx) = mpsc::channel(32);
    let (view_tx, view_rx) = watch::channel(ViewState::default());
    let runner = tokio::spawn(coordinator.run(query_rx, view_tx));

    let printer = {
        let mut views = view_rx.clone();
        let renderer = renderer.clone();
        tokio::spawn(async move {
            while views.changed().await.is_ok() {
                let view = views.borrow_and_update().clone();
                println!("{}", renderer.render(&view));
            }
        })
    };

    println!(
        "🔎 Searching project \"{}\". Type a query per line, :open N to get a link, :q to quit.",
        config.project
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            InputLine::Query(query) => query_tx.send(query).await?,
            InputLine::Open(n) => {
                let view = view_rx.borrow().clone();
                match renderer.entries(&view).get(n - 1) {
                    Some(entry) => println!("🌐 {}", entry.url),
                    None => println!("❌ No entry {}", n),
                }
            }
            InputLine::Quit => break,
            InputLine::Unknown(input) => println!("❓ Unknown command: {}", input),
        }
    }

    debug!("Leaving interactive mode");
    drop(query_tx);
    runner.await?;
    printer.await?;

    Ok(())
}
