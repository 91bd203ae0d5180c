//! Incremental search coordination
//!
//! [`SearchCoordinator`] owns the current query and everything derived from it:
//! - the cached snapshot of recently accessed pages and its filtered view
//! - the debounce timer in front of the remote search
//! - the cancellation handle of the single in-flight search
//! - the live results of the last completed search
//!
//! Timers and network calls run as background tasks that never touch the
//! coordinator; they report back through [`CoordinatorEvent`]s which are applied
//! by `&mut self`. Every timer and search carries a sequence number, and events
//! from a superseded timer or search are dropped.

use crate::cache::PageCache;
use crate::error::Result;
use crate::filter::filter_pages;
use crate::page::{Page, SearchPayload};
use crate::remote::{search_by_query, CancellationHandle, RemoteSearchClient, SearchOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Completion of background work owned by a coordinator
#[derive(Debug)]
pub enum CoordinatorEvent {
    /// The debounce timer armed with this sequence number expired
    DebounceElapsed { timer: u64 },
    /// The search issued with this sequence number ended
    SearchFinished { search: u64, outcome: SearchOutcome },
    /// The startup recently-accessed fetch ended
    RecentFetched(Result<SearchPayload>),
}

/// Everything a renderer needs, projected from coordinator state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Current query text
    pub query: String,
    /// Whether a remote search is in flight
    pub loading: bool,
    /// Offer to create a page named after the query (no match found)
    pub create_page: Option<String>,
    /// Live results of the last completed search
    pub search: Vec<Page>,
    /// Filtered snapshot, or the whole snapshot when nothing matches
    pub recent: Vec<Page>,
}

/// Debounced, cancellable search over a remote project with a cached fallback
pub struct SearchCoordinator {
    client: Arc<dyn RemoteSearchClient>,
    cache: PageCache,
    debounce: Duration,

    query: String,
    live_results: Vec<Page>,
    cache_snapshot: Vec<Page>,
    filtered_cache: Vec<Page>,
    loading: bool,

    debounce_timer: Option<JoinHandle<()>>,
    timer_seq: u64,
    pending_cancel: Option<CancellationHandle>,
    search_seq: u64,
    fetching_recent: bool,

    events_tx: mpsc::UnboundedSender<CoordinatorEvent>,
    events_rx: mpsc::UnboundedReceiver<CoordinatorEvent>,
}

impl SearchCoordinator {
    /// Create a coordinator with an empty snapshot. Call [`start`](Self::start) to load it.
    pub fn new(client: Arc<dyn RemoteSearchClient>, cache: PageCache, debounce: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            client,
            cache,
            debounce,
            query: String::new(),
            live_results: Vec::new(),
            cache_snapshot: Vec::new(),
            filtered_cache: Vec::new(),
            loading: false,
            debounce_timer: None,
            timer_seq: 0,
            pending_cancel: None,
            search_seq: 0,
            fetching_recent: false,
            events_tx,
            events_rx,
        }
    }

    /// Load the persisted snapshot and launch the recently-accessed refresh.
    ///
    /// The refresh runs in the background; its result arrives as a
    /// [`CoordinatorEvent::RecentFetched`] and always wins over the loaded snapshot.
    pub async fn start(&mut self) {
        let client = Arc::clone(&self.client);
        let tx = self.events_tx.clone();
        self.fetching_recent = true;
        tokio::spawn(async move {
            let result = client.fetch_recently_accessed_pages().await;
            let _ = tx.send(CoordinatorEvent::RecentFetched(result));
        });

        let pages = self.cache.load().await;
        if !pages.is_empty() {
            info!("Showing {} cached pages", pages.len());
            self.replace_snapshot(pages);
        }
    }

    /// Handle a keystroke carrying the full new query
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.filtered_cache = filter_pages(&self.query, &self.cache_snapshot);
        debug!(
            "Query {:?}: {} cached pages match",
            self.query,
            self.filtered_cache.len()
        );

        if self.query.is_empty() {
            self.cancel_debounce();
            self.cancel_search();
            self.live_results.clear();
            self.loading = false;
            return;
        }

        self.arm_debounce();
    }

    /// Wait for the next background event
    pub async fn next_event(&mut self) -> Option<CoordinatorEvent> {
        self.events_rx.recv().await
    }

    /// Apply a background event to the coordinator state
    pub async fn apply(&mut self, event: CoordinatorEvent) {
        match event {
            CoordinatorEvent::DebounceElapsed { timer } => {
                if timer != self.timer_seq || self.debounce_timer.is_none() {
                    debug!("Ignoring superseded debounce timer {}", timer);
                    return;
                }
                self.debounce_timer = None;
                self.issue_search();
            }
            CoordinatorEvent::SearchFinished { search, outcome } => {
                if search != self.search_seq {
                    debug!("Ignoring superseded search {}", search);
                    return;
                }
                self.finish_search(outcome);
            }
            CoordinatorEvent::RecentFetched(result) => {
                self.fetching_recent = false;
                self.finish_recent_fetch(result).await;
            }
        }
    }

    /// Process events until no timer, search or startup fetch is outstanding
    pub async fn settle(&mut self) {
        while !self.is_idle() {
            match self.next_event().await {
                Some(event) => self.apply(event).await,
                None => break,
            }
        }
    }

    /// Drive the coordinator from a stream of queries, publishing every changed view.
    ///
    /// Returns once `queries` is closed; outstanding work is cancelled.
    pub async fn run(
        mut self,
        mut queries: mpsc::Receiver<String>,
        views: watch::Sender<ViewState>,
    ) {
        self.start().await;
        self.publish(&views);

        loop {
            tokio::select! {
                query = queries.recv() => match query {
                    Some(query) => self.set_query(query),
                    None => break,
                },
                Some(event) = self.events_rx.recv() => self.apply(event).await,
            }
            self.publish(&views);
        }

        debug!("Query stream closed, stopping coordinator");
    }

    /// Read-only projection for the renderer
    pub fn view(&self) -> ViewState {
        let create_page = (!self.query.is_empty() && !self.loading && self.live_results.is_empty())
            .then(|| self.query.clone());

        let recent = if self.filtered_cache.is_empty() {
            self.cache_snapshot.clone()
        } else {
            self.filtered_cache.clone()
        };

        ViewState {
            query: self.query.clone(),
            loading: self.loading,
            create_page,
            search: self.live_results.clone(),
            recent,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn live_results(&self) -> &[Page] {
        &self.live_results
    }

    pub fn cache_snapshot(&self) -> &[Page] {
        &self.cache_snapshot
    }

    pub fn filtered_cache(&self) -> &[Page] {
        &self.filtered_cache
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// No debounce timer armed, no search in flight, startup fetch done
    pub fn is_idle(&self) -> bool {
        self.debounce_timer.is_none() && self.pending_cancel.is_none() && !self.fetching_recent
    }

    fn arm_debounce(&mut self) {
        self.cancel_debounce();

        let timer = self.timer_seq;
        let delay = self.debounce;
        let tx = self.events_tx.clone();
        self.debounce_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(CoordinatorEvent::DebounceElapsed { timer });
        }));
    }

    fn cancel_debounce(&mut self) {
        if let Some(timer) = self.debounce_timer.take() {
            timer.abort();
        }
        self.timer_seq += 1;
    }

    fn issue_search(&mut self) {
        self.cancel_search();

        let search = self.search_seq;
        let (pending, handle) = search_by_query(Arc::clone(&self.client), self.query.clone());
        self.pending_cancel = Some(handle);
        self.loading = true;
        debug!("Issued search {} for {:?}", search, self.query);

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let outcome = pending.await;
            let _ = tx.send(CoordinatorEvent::SearchFinished { search, outcome });
        });
    }

    fn cancel_search(&mut self) {
        if let Some(handle) = self.pending_cancel.take() {
            debug!("Cancelling search {}", self.search_seq);
            handle.cancel();
        }
        self.search_seq += 1;
    }

    fn finish_search(&mut self, outcome: SearchOutcome) {
        let result = match outcome {
            SearchOutcome::Cancelled => return,
            SearchOutcome::Completed(result) => result,
        };

        self.pending_cancel = None;
        self.loading = false;

        match result {
            Ok(SearchPayload::Pages(found)) => {
                debug!("Search for {:?} returned {} pages", self.query, found.pages.len());
                self.live_results = found.pages;
            }
            Ok(SearchPayload::Malformed) => {
                warn!("Malformed search response for {:?}, keeping previous results", self.query);
            }
            Err(e) => {
                warn!("Search for {:?} failed, keeping previous results: {}", self.query, e);
            }
        }
    }

    async fn finish_recent_fetch(&mut self, result: Result<SearchPayload>) {
        let pages = match result {
            Ok(SearchPayload::Pages(found)) if !found.pages.is_empty() => found.pages,
            Ok(SearchPayload::Pages(_)) => {
                debug!("Recently accessed fetch returned no pages, keeping snapshot");
                return;
            }
            Ok(SearchPayload::Malformed) => {
                warn!("Malformed recently accessed response, keeping snapshot");
                return;
            }
            Err(e) => {
                warn!("Recently accessed fetch failed, keeping snapshot: {}", e);
                return;
            }
        };

        info!("Refreshed {} recently accessed pages", pages.len());
        if let Err(e) = self.cache.save(&pages).await {
            warn!("Failed to persist page cache: {}", e);
        }
        self.replace_snapshot(pages);
    }

    fn replace_snapshot(&mut self, pages: Vec<Page>) {
        self.cache_snapshot = pages;
        self.filtered_cache = filter_pages(&self.query, &self.cache_snapshot);
    }

    fn publish(&self, views: &watch::Sender<ViewState>) {
        let next = self.view();
        views.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

impl Drop for SearchCoordinator {
    fn drop(&mut self) {
        if let Some(timer) = self.debounce_timer.take() {
            timer.abort();
        }
        if let Some(handle) = self.pending_cancel.take() {
            handle.cancel();
        }
    }
}
