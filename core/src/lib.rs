//! # scrap Core
//!
//! Core library for scrap - incremental search over a Scrapbox project.
//!
//! This library keeps a search box responsive on a slow network: keystrokes
//! filter a locally cached snapshot of recently accessed pages right away,
//! while a debounced, cancellable remote query supplies the live results.

// Core modules
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod navigation;
pub mod page;
pub mod remote;

// Re-export commonly used types
pub use cache::PageCache;
pub use config::ProjectConfig;
pub use coordinator::{CoordinatorEvent, SearchCoordinator, ViewState};
pub use error::{Error, Result};
pub use filter::filter_pages;
pub use navigation::{encode_uri, encode_uri_component, page_url};
pub use page::{parse_search_payload, Page, SearchPayload, SearchResult};
pub use remote::{
    search_by_query, CancellationHandle, PendingSearch, RemoteSearchClient, ScrapboxClient,
    SearchOutcome,
};

/// Current version of the scrap-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing for the library, filtered by `RUST_LOG`. Logs go to stderr.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Initialize tracing with a specific debug mode
pub fn init_tracing_with_debug(debug: bool) {
    let filter = if debug { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();
}
