use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::CatalogConfig;
use crate::song::{SongRecord, TrackId, ValidationError};

const ENTITY: &str = "song";
const ARTWORK_FIELDS: [&str; 3] = ["artworkUrl100", "artworkUrl60", "artworkUrl30"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    Transport,
    Format,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid catalog endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("unsupported catalog endpoint scheme '{0}'")]
    UnsupportedScheme(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("catalog returned status {0}")]
    Status(StatusCode),
    #[error("failed to parse catalog response: {0}")]
    Format(#[from] serde_json::Error),
}

impl SearchError {
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::Format(_) => SearchErrorKind::Format,
            SearchError::InvalidEndpoint(_)
            | SearchError::UnsupportedScheme(_)
            | SearchError::Transport(_)
            | SearchError::Status(_) => SearchErrorKind::Transport,
        }
    }
}

/// A free-text query that is known to be non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Returns `None` when the trimmed text is empty; such queries never
    /// reach the provider.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Vec<Value>,
}

/// Single-shot client for the catalog search provider.
///
/// Holds no state between calls beyond the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    endpoint: Url,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, SearchError> {
        let endpoint = Url::parse(&config.endpoint)?;
        match endpoint.scheme() {
            "http" | "https" => {}
            scheme => return Err(SearchError::UnsupportedScheme(scheme.to_string())),
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("term", query.as_str())
            .append_pair("entity", ENTITY);
        url
    }

    /// Issues exactly one request and normalizes the provider's `results`.
    ///
    /// Entries without a usable `trackId` are dropped; the rest keep the
    /// provider's order.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SongRecord>, SearchError> {
        let url = self.search_url(query);
        debug!(%url, "catalog request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }

        let body = response.bytes().await?;
        let payload: SearchResponse = serde_json::from_slice(&body)?;
        let received = payload.results.len();
        let records = normalize_results(payload.results);
        info!(
            query = query.as_str(),
            received,
            kept = records.len(),
            "catalog search completed"
        );

        Ok(records)
    }
}

fn normalize_results(entries: Vec<Value>) -> Vec<SongRecord> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| match normalize_entry(entry) {
            Ok(record) => Some(record),
            Err(error) => {
                debug!(position, %error, "dropping catalog entry");
                None
            }
        })
        .collect()
}

fn normalize_entry(entry: &Value) -> Result<SongRecord, ValidationError> {
    let object = entry.as_object().ok_or(ValidationError::MissingTrackId)?;
    let id = object
        .get("trackId")
        .ok_or(ValidationError::MissingTrackId)
        .and_then(TrackId::from_value)?;

    let artwork_url = ARTWORK_FIELDS.iter().find_map(|field| {
        object
            .get(*field)
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
    });

    Ok(SongRecord::new(
        id,
        text_field(object, "trackName"),
        text_field(object, "artistName"),
        artwork_url,
    ))
}

fn text_field(object: &Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
