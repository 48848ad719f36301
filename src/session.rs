use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::catalog::{CatalogClient, SearchError, SearchQuery};
use crate::config::CatalogConfig;
use crate::library::{FavoriteToggle, LibraryState};
use crate::song::{SongRecord, TrackId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank; nothing was sent and `results` are untouched.
    Skipped,
    Applied { count: usize },
    /// A newer search or a reset landed first; the response was dropped.
    Superseded,
}

/// Actions the presentation layer dispatches, over state it can share.
///
/// Every mutation of [`LibraryState`] happens under its mutex, which is never
/// held across the network request.
#[derive(Debug)]
pub struct SearchSession {
    client: CatalogClient,
    state: Arc<Mutex<LibraryState>>,
    query: Mutex<String>,
    revision: watch::Sender<u64>,
}

impl SearchSession {
    pub fn new(client: CatalogClient) -> Self {
        Self::with_state(client, Arc::new(Mutex::new(LibraryState::new())))
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, SearchError> {
        Ok(Self::new(CatalogClient::new(config)?))
    }

    pub fn with_state(client: CatalogClient, state: Arc<Mutex<LibraryState>>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            client,
            state,
            query: Mutex::new(String::new()),
            revision,
        }
    }

    pub fn state(&self) -> Arc<Mutex<LibraryState>> {
        Arc::clone(&self.state)
    }

    /// Yields a new revision number after every visible state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn query(&self) -> String {
        self.query
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_query(&self, text: &str) {
        let mut query = self.query.lock().unwrap_or_else(PoisonError::into_inner);
        query.clear();
        query.push_str(text);
    }

    pub fn results(&self) -> Vec<SongRecord> {
        self.lock_state().results().to_vec()
    }

    pub fn favorites(&self) -> Vec<SongRecord> {
        self.lock_state().favorites().to_vec()
    }

    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.lock_state().is_favorite(id)
    }

    /// Searches the catalog for `text` and replaces `results` with the answer.
    ///
    /// On error `results` keep their previous contents.
    pub async fn submit_search(&self, text: &str) -> Result<SearchOutcome, SearchError> {
        self.set_query(text);
        let Some(query) = SearchQuery::parse(text) else {
            debug!("skipping blank search");
            return Ok(SearchOutcome::Skipped);
        };

        let ticket = self.lock_state().begin_search();
        info!(query = query.as_str(), ?ticket, "submitting search");

        let records = match self.client.search(&query).await {
            Ok(records) => records,
            Err(error) => {
                warn!(query = query.as_str(), kind = ?error.kind(), %error, "search failed");
                self.lock_state().abandon_search(ticket);
                return Err(error);
            }
        };

        let count = records.len();
        if !self.lock_state().apply_search(ticket, records) {
            debug!(query = query.as_str(), ?ticket, "discarding superseded search response");
            return Ok(SearchOutcome::Superseded);
        }

        self.notify();
        Ok(SearchOutcome::Applied { count })
    }

    pub fn toggle_favorite(&self, record: &SongRecord) -> FavoriteToggle {
        let toggle = self.lock_state().toggle_favorite(record.clone());
        debug!(track_id = %record.id(), ?toggle, "favorite toggled");
        self.notify();
        toggle
    }

    pub fn add_favorite(&self, record: &SongRecord) -> bool {
        let added = self.lock_state().add_favorite(record.clone());
        if added {
            self.notify();
        }
        added
    }

    pub fn remove_favorite(&self, id: &TrackId) -> Option<SongRecord> {
        let removed = self.lock_state().remove_favorite(id);
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Clears the query text and the results; favorites stay.
    pub fn go_home(&self) {
        self.set_query("");
        self.lock_state().clear();
        self.notify();
    }

    fn lock_state(&self) -> MutexGuard<'_, LibraryState> {
        // Mutations are all-or-nothing, so a poisoned lock still guards valid state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}
