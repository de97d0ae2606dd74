use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, oneshot, watch};
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::models::Product;
use crate::traits::{ProductQuery, ProductSource};

/// A failed fetch attempt, kept as the message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    message: String,
}

impl FetchFailure {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&anyhow::Error> for FetchFailure {
    fn from(err: &anyhow::Error) -> Self {
        Self {
            message: format!("{err:#}"),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Everything the list view renders. Only [`CatalogController`] writes it.
#[derive(Debug, Clone)]
pub struct CatalogState {
    pub items: Vec<Product>,
    pub is_loading: bool,
    pub error: Option<FetchFailure>,
    /// 1-based browse page; advances after every non-empty batch
    pub page: u64,
    /// Empty means browse mode
    pub search_query: String,
    pub has_more: bool,
    /// Bumped on every query reset so late responses can be recognised
    pub generation: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
            page: 1,
            search_query: String::new(),
            has_more: true,
            generation: 0,
        }
    }
}

/// Result of a single fetch attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// This many products were appended
    Loaded(usize),
    /// The server returned nothing, or the list was already exhausted
    Exhausted,
    /// The request failed and the error was stored
    Failed,
    /// Another fetch was in flight, nothing was requested
    Busy,
    /// The query changed before or during the request, the result was dropped
    Stale,
}

/// A debounced search waiting for its quiet period. Dropping it cancels the search.
struct PendingSearch {
    query: String,
    generation: u64,
    _cancel: oneshot::Sender<()>,
}

struct Shared {
    source: Arc<dyn ProductSource>,
    page_size: u64,
    search_debounce: Duration,
    state: watch::Sender<CatalogState>,
    fetch_lock: AsyncMutex<()>,
    pending: Mutex<Option<PendingSearch>>,
}

/// Coordinates paging, search resets and debouncing against a [`ProductSource`].
///
/// At most one fetch runs at a time. Requests for more data while a fetch is
/// outstanding or a search is debouncing are ignored; fetches triggered by a
/// query change wait their turn.
#[derive(Clone)]
pub struct CatalogController {
    shared: Arc<Shared>,
}

impl CatalogController {
    pub fn new(source: Arc<dyn ProductSource>, config: &AppConfig) -> Self {
        let (state, _) = watch::channel(CatalogState::default());

        Self {
            shared: Arc::new(Shared {
                source,
                page_size: config.page_size,
                search_debounce: config.search_debounce,
                state,
                fetch_lock: AsyncMutex::new(()),
                pending: Mutex::new(None),
            }),
        }
    }

    /// Receiver that observes every state change
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.shared.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> CatalogState {
        self.shared.state.borrow().clone()
    }

    /// Reacts to a new search text.
    ///
    /// The list is reset synchronously. An empty query fetches the first browse
    /// page right away; any other query is fetched once `search_debounce` passes
    /// without another call. Must be called from within a tokio runtime.
    pub fn handle_search(&self, query: &str) {
        let mut generation = 0;
        self.shared.state.send_modify(|state| {
            state.search_query = query.to_string();
            state.items.clear();
            state.page = 1;
            state.has_more = true;
            state.generation += 1;
            generation = state.generation;
        });

        if let Some(previous) = self.pending().take() {
            debug!("Cancelled pending search for '{}'", previous.query);
        }

        if query.is_empty() {
            info!("Search cleared, returning to browse mode");
            let controller = self.clone();
            tokio::spawn(async move {
                controller.fetch_for_generation(generation).await;
            });
            return;
        }

        let (cancel, cancelled) = oneshot::channel::<()>();
        let delay = self.shared.search_debounce;
        let controller = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled => return,
                () = tokio::time::sleep(delay) => {}
            }
            controller.clear_pending(generation);
            controller.fetch_for_generation(generation).await;
        });

        debug!("Search for '{}' scheduled in {:?}", query, delay);
        *self.pending() = Some(PendingSearch {
            query: query.to_string(),
            generation,
            _cancel: cancel,
        });
    }

    /// Requests the next batch for the current query.
    ///
    /// Does nothing once the list is exhausted, while a debounced search is
    /// waiting, or while another fetch is in flight.
    pub async fn load_more(&self) -> FetchOutcome {
        if !self.shared.state.borrow().has_more {
            debug!("No more products to load");
            return FetchOutcome::Exhausted;
        }

        if self.pending().is_some() {
            debug!("Search still debouncing, ignoring request for more");
            return FetchOutcome::Busy;
        }

        let Ok(_guard) = self.shared.fetch_lock.try_lock() else {
            debug!("Fetch already in flight, ignoring request for more");
            return FetchOutcome::Busy;
        };

        self.fetch_locked().await
    }

    async fn fetch_for_generation(&self, generation: u64) -> FetchOutcome {
        let _guard = self.shared.fetch_lock.lock().await;

        if self.shared.state.borrow().generation != generation {
            debug!("Dropping fetch for superseded query");
            return FetchOutcome::Stale;
        }

        self.fetch_locked().await
    }

    /// Runs one request. Caller holds `fetch_lock`.
    async fn fetch_locked(&self) -> FetchOutcome {
        let (query, generation) = {
            let state = self.shared.state.borrow();
            if !state.has_more {
                return FetchOutcome::Exhausted;
            }
            (
                ProductQuery::for_page(&state.search_query, state.page, self.shared.page_size),
                state.generation,
            )
        };

        self.shared.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });

        info!("Fetching {:?} from {}", query, self.shared.source.config().name);
        let result = self.shared.source.fetch_products(&query).await;

        let mut outcome = FetchOutcome::Stale;
        self.shared.state.send_modify(|state| {
            state.is_loading = false;
            if state.generation != generation {
                return;
            }

            outcome = match result {
                Ok(products) if products.is_empty() => {
                    state.has_more = false;
                    FetchOutcome::Exhausted
                }
                Ok(products) => {
                    let count = products.len();
                    state.items.extend(products);
                    state.page += 1;
                    FetchOutcome::Loaded(count)
                }
                Err(err) => {
                    state.error = Some(FetchFailure::from(&err));
                    FetchOutcome::Failed
                }
            };
        });

        match outcome {
            FetchOutcome::Loaded(count) => info!("Loaded {} products", count),
            FetchOutcome::Exhausted => info!("Reached the end of the catalog"),
            FetchOutcome::Failed => {
                if let Some(err) = &self.shared.state.borrow().error {
                    warn!("Fetch failed: {}", err);
                }
            }
            FetchOutcome::Stale => debug!("Discarded response for superseded query"),
            FetchOutcome::Busy => {}
        }

        outcome
    }

    /// Forgets the pending search once its quiet period has passed
    fn clear_pending(&self, generation: u64) {
        let mut pending = self.pending();
        if pending.as_ref().is_some_and(|p| p.generation == generation) {
            *pending = None;
        }
    }

    fn pending(&self) -> MutexGuard<'_, Option<PendingSearch>> {
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
