//! Remote page search client abstractions and implementations

pub mod scrapbox;

pub use scrapbox::{ScrapboxClient, RECENT_PAGE_LIMIT};

use crate::error::{RemoteError, Result};
use crate::page::SearchPayload;
use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::{AbortHandle, JoinHandle};

/// Trait for remote page sources bound to one project and session
#[async_trait]
pub trait RemoteSearchClient: Send + Sync {
    /// Run a free-text query against the project
    async fn search(&self, query: &str) -> Result<SearchPayload>;

    /// Fetch the most recently accessed pages, most recent first
    async fn fetch_recently_accessed_pages(&self) -> Result<SearchPayload>;
}

/// How an issued search ended
#[derive(Debug)]
pub enum SearchOutcome {
    /// The request ran to completion, successfully or not
    Completed(Result<SearchPayload>),
    /// The request was aborted through its [`CancellationHandle`]
    Cancelled,
}

/// A search running in the background; resolves to a [`SearchOutcome`]
#[derive(Debug)]
pub struct PendingSearch {
    task: JoinHandle<Result<SearchPayload>>,
}

impl Future for PendingSearch {
    type Output = SearchOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.task.poll_unpin(cx).map(|joined| match joined {
            Ok(result) => SearchOutcome::Completed(result),
            Err(e) if e.is_cancelled() => SearchOutcome::Cancelled,
            Err(e) => SearchOutcome::Completed(Err(RemoteError::TaskFailed {
                message: e.to_string(),
            }
            .into())),
        })
    }
}

/// Aborts one in-flight search. Cancelling twice, or after completion, does nothing.
#[derive(Debug)]
pub struct CancellationHandle {
    abort: AbortHandle,
}

impl CancellationHandle {
    /// Abort the search if it is still running
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the search has completed or been cancelled
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Issue a search in the background. Must be called from within a tokio runtime.
pub fn search_by_query(
    client: Arc<dyn RemoteSearchClient>,
    query: String,
) -> (PendingSearch, CancellationHandle) {
    let task = tokio::spawn(async move { client.search(&query).await });
    let handle = CancellationHandle {
        abort: task.abort_handle(),
    };
    (PendingSearch { task }, handle)
}
