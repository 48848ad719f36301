pub mod catalog;
pub mod config;
pub mod library;
pub mod session;
pub mod song;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogClient, SearchError, SearchErrorKind, SearchQuery};
pub use config::CatalogConfig;
pub use library::{FavoriteToggle, LibraryState, SearchTicket};
pub use session::{SearchOutcome, SearchSession};
pub use song::{SongRecord, TrackId, ValidationError};
