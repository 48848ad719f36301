use std::collections::HashSet;

use crate::song::{SongRecord, TrackId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
}

/// Sequence number handed out when a search is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

/// Search results and favorites for one session.
///
/// `favorites` holds at most one record per [`TrackId`] and keeps insertion
/// order for display. `results` is whatever the last applied search returned,
/// duplicates included.
#[derive(Debug, Default)]
pub struct LibraryState {
    results: Vec<SongRecord>,
    favorites: Vec<SongRecord>,
    favorite_ids: HashSet<TrackId>,
    issued: u64,
    applied: u64,
}

impl LibraryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[SongRecord] {
        &self.results
    }

    pub fn favorites(&self) -> &[SongRecord] {
        &self.favorites
    }

    pub fn set_results(&mut self, records: Vec<SongRecord>) {
        self.results = records;
    }

    /// Empties `results` and supersedes every search issued so far, so a
    /// response still in flight cannot repopulate them.
    pub fn clear(&mut self) {
        self.results.clear();
        self.applied = self.issued;
    }

    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.favorite_ids.contains(id)
    }

    /// Returns `false` when a favorite with the same id already exists; the
    /// existing record is kept as is.
    pub fn add_favorite(&mut self, record: SongRecord) -> bool {
        if !self.favorite_ids.insert(record.id().clone()) {
            return false;
        }
        self.favorites.push(record);
        true
    }

    pub fn remove_favorite(&mut self, id: &TrackId) -> Option<SongRecord> {
        let position = self
            .favorites
            .iter()
            .position(|favorite| favorite.id() == id)?;
        self.favorite_ids.remove(id);
        Some(self.favorites.remove(position))
    }

    pub fn toggle_favorite(&mut self, record: SongRecord) -> FavoriteToggle {
        if self.is_favorite(record.id()) {
            self.remove_favorite(record.id());
            FavoriteToggle::Removed
        } else {
            self.add_favorite(record);
            FavoriteToggle::Added
        }
    }

    pub fn begin_search(&mut self) -> SearchTicket {
        self.issued += 1;
        SearchTicket(self.issued)
    }

    /// Replaces `results` unless a newer search was already applied or the
    /// results were cleared after this ticket was issued.
    pub fn apply_search(&mut self, ticket: SearchTicket, records: Vec<SongRecord>) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        self.results = records;
        true
    }

    /// Settles a search that produced no results, so older searches still in
    /// flight cannot overwrite what the user currently sees.
    pub fn abandon_search(&mut self, ticket: SearchTicket) {
        self.applied = self.applied.max(ticket.0);
    }
}
