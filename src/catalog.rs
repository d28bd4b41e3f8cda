//! City catalog service: the runtime that owns catalog state.
//!
//! [`CatalogService`] is the surface the UI talks to. It owns the
//! [`CatalogState`], the [`WorkerHandle`] and the [`EventBus`], and executes the
//! actions returned by [`handle_event`]. Every mutation happens on the task that
//! owns the service; search completions are queued by the worker and applied only
//! when the owner drains them with [`pump`](CatalogService::pump),
//! [`run_until_idle`](CatalogService::run_until_idle) or
//! [`handle_worker_response`](CatalogService::handle_worker_response).
//!
//! # Example
//!
//! ```no_run
//! use cityfinder::{CatalogService, Config};
//!
//! # async fn demo() -> cityfinder::Result<()> {
//! let mut catalog = CatalogService::from_config(&Config::default())?;
//! let mut events = catalog.subscribe();
//!
//! catalog.search("Paris", |result| {
//!     if let Err(e) = result {
//!         eprintln!("search failed: {e}");
//!     }
//! })?;
//! catalog.run_until_idle().await;
//!
//! while let Ok(event) = events.try_recv() {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

use crate::app::{handle_event, Action, CatalogEvent, CatalogState, Event, EventBus};
use crate::domain::error::{CityfinderError, Result};
use crate::domain::{CityRecord, SearchError};
use crate::infrastructure::store_path;
use crate::remote::{ReqwestTransport, SearchClient, SearchTransport};
use crate::storage::{FavoritesStore, JsonFileStore, KeyValueStore};
use crate::worker::{SearchSeq, SearchWorker, WorkerHandle, WorkerResponse};
use crate::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Outcome handed to a search callback.
pub type SearchOutcome = std::result::Result<Vec<CityRecord>, SearchError>;

/// Completion callback registered by [`CatalogService::search`].
pub type SearchCallback = Box<dyn FnOnce(SearchOutcome) + Send>;

/// Search results, favorites and selection for one UI.
pub struct CatalogService {
    state: CatalogState,
    worker: WorkerHandle,
    events: EventBus,
    pending: HashMap<SearchSeq, SearchCallback>,
}

impl CatalogService {
    /// Creates a service around a search client and a loaded favorites set.
    ///
    /// Spawns the search worker, so this must be called from within a tokio runtime.
    #[must_use]
    pub fn new(client: SearchClient, favorites: FavoritesStore) -> Self {
        let worker = SearchWorker::new(client).spawn();
        tracing::debug!(favorites = favorites.len(), "catalog service started");

        Self {
            state: CatalogState::new(favorites),
            worker,
            events: EventBus::default(),
            pending: HashMap::new(),
        }
    }

    /// Creates a service from configuration, with favorites in `store.json` under
    /// the configured data directory and searches sent over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is invalid or the store file cannot be
    /// opened.
    pub fn from_config(config: &Config) -> Result<Self> {
        let path = store_path(&config.data_dir());
        let storage = JsonFileStore::new(path)?;
        Self::with_storage(config, Box::new(storage), Arc::new(ReqwestTransport::new()))
    }

    /// Creates a service from configuration with explicit storage and transport.
    ///
    /// # Errors
    ///
    /// Returns [`CityfinderError::Config`] if the endpoint is invalid.
    pub fn with_storage(
        config: &Config,
        storage: Box<dyn KeyValueStore>,
        transport: Arc<dyn SearchTransport>,
    ) -> Result<Self> {
        let client = SearchClient::new(config, transport)?;
        let favorites = FavoritesStore::load(storage, config.identity);
        Ok(Self::new(client, favorites))
    }

    /// Starts a search and returns its sequence number.
    ///
    /// `on_complete` runs exactly once, on the task that drains completions, with
    /// this request's own outcome. Results are applied only if no newer search was
    /// issued in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`CityfinderError::Worker`] if the worker has stopped; `on_complete`
    /// has then already been called with a transport error.
    pub fn search<F>(&mut self, query: &str, on_complete: F) -> Result<SearchSeq>
    where
        F: FnOnce(SearchOutcome) + Send + 'static,
    {
        let _span = tracing::debug_span!("catalog_search", query = %query).entered();

        let (_, actions) = handle_event(
            &mut self.state,
            &Event::Search {
                query: query.to_string(),
            },
        )?;
        let seq = self.state.latest_seq();
        self.pending.insert(seq, Box::new(on_complete));

        for action in actions {
            if let Err(e) = self.execute_action(action) {
                tracing::warn!(seq = seq, error = %e, "failed to post search");
                self.state.withdraw_seq(seq);
                if let Some(callback) = self.pending.remove(&seq) {
                    callback(Err(SearchError::Transport(e.to_string())));
                }
                return Err(e);
            }
        }

        Ok(seq)
    }

    /// Adds `city` to favorites, or removes it if present. Returns the new membership.
    ///
    /// Storage failures are logged and published as [`CatalogEvent::PersistFailed`].
    pub fn toggle_favorite(&mut self, city: &CityRecord) -> bool {
        if let Err(e) = self.dispatch(&Event::ToggleFavorite(city.clone())) {
            tracing::warn!(error = %e, "toggle favorite failed");
        }
        self.state.is_favorite(city)
    }

    #[must_use]
    pub fn is_favorite(&self, city: &CityRecord) -> bool {
        self.state.is_favorite(city)
    }

    /// Selects the result at `index`. Returns `false` when out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.state.results().len() {
            return false;
        }
        if let Err(e) = self.dispatch(&Event::Select(index)) {
            tracing::warn!(error = %e, "select failed");
        }
        true
    }

    #[must_use]
    pub fn selected(&self) -> Option<&CityRecord> {
        self.state.selected()
    }

    /// Returns the selected city for the detail view.
    ///
    /// # Errors
    ///
    /// Returns [`CityfinderError::NoSelection`] if nothing is selected.
    pub fn selected_detail(&self) -> Result<&CityRecord> {
        self.state.selected().ok_or(CityfinderError::NoSelection)
    }

    #[must_use]
    pub fn results(&self) -> &[CityRecord] {
        self.state.results()
    }

    #[must_use]
    pub fn favorites(&self) -> &[CityRecord] {
        self.state.favorites()
    }

    #[must_use]
    pub fn filtered_favorites(&self, query: &str) -> Vec<&CityRecord> {
        self.state.filtered_favorites(query)
    }

    #[must_use]
    pub const fn state(&self) -> &CatalogState {
        &self.state
    }

    /// Subscribes to catalog events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.events.subscribe()
    }

    /// Stops the search worker. Later searches fail with [`CityfinderError::Worker`].
    ///
    /// Searches already posted still complete; drain them as usual.
    pub async fn shutdown(&mut self) {
        self.worker.shutdown().await;
    }

    /// Number of searches whose callbacks have not run yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Waits for the next worker completion without applying it.
    ///
    /// Pass the response to [`handle_worker_response`](Self::handle_worker_response).
    /// Suitable as a `tokio::select!` branch.
    pub async fn next_response(&mut self) -> Option<WorkerResponse> {
        self.worker.recv().await
    }

    /// Applies one worker completion and runs its callback.
    ///
    /// Returns `true` if observable state changed.
    pub fn handle_worker_response(&mut self, response: WorkerResponse) -> bool {
        match self.dispatch(&Event::WorkerResponse(response)) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, "failed to apply search completion");
                false
            }
        }
    }

    /// Applies every completion already queued by the worker. Never waits.
    ///
    /// Returns the number of completions applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(response) = self.worker.try_recv() {
            self.handle_worker_response(response);
            applied += 1;
        }
        applied
    }

    /// Waits until every issued search has completed and been applied.
    pub async fn run_until_idle(&mut self) {
        while !self.pending.is_empty() {
            match self.worker.recv().await {
                Some(response) => {
                    self.handle_worker_response(response);
                }
                None => {
                    tracing::warn!(pending = self.pending.len(), "search worker stopped with searches in flight");
                    break;
                }
            }
        }
    }

    fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (changed, actions) = handle_event(&mut self.state, event)?;
        for action in actions {
            self.execute_action(action)?;
        }
        Ok(changed)
    }

    /// Executes one action returned by the event handler.
    ///
    /// # Errors
    ///
    /// Returns an error if a message cannot be posted to the worker.
    pub fn execute_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::PostToWorker(message) => self.worker.post(message),
            Action::Publish(event) => {
                self.events.emit(event);
                Ok(())
            }
            Action::Complete { seq, result } => {
                match self.pending.remove(&seq) {
                    Some(callback) => callback(result),
                    None => tracing::debug!(seq = seq, "no callback registered for search"),
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("state", &self.state)
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
