use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("track is missing its identifier")]
    MissingTrackId,
}

/// Opaque catalog identifier for a track.
///
/// The provider sends identifiers as JSON numbers, but strings are accepted
/// too; both are normalized to the same textual key so `12` and `"12"` name
/// the same track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingTrackId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(id) => Self::new(id.as_str()),
            Value::Number(number) => number
                .as_u64()
                .map(|value| value.to_string())
                .or_else(|| number.as_i64().map(|value| value.to_string()))
                .ok_or(ValidationError::MissingTrackId)
                .and_then(Self::new),
            _ => Err(ValidationError::MissingTrackId),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for TrackId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

/// One track returned by the catalog provider.
///
/// Records are compared and hashed by [`TrackId`] alone, so a favorite and a
/// later search hit with refreshed artwork are still the same track.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRecord {
    id: TrackId,
    title: String,
    artist: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    artwork_url: Option<String>,
}

impl SongRecord {
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        artwork_url: Option<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            artwork_url: artwork_url.filter(|url| !url.trim().is_empty()),
        }
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn artwork_url(&self) -> Option<&str> {
        self.artwork_url.as_deref()
    }
}

impl PartialEq for SongRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SongRecord {}

impl Hash for SongRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
