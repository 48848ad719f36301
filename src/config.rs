use std::env;

pub const DEFAULT_ENDPOINT: &str = "https://itunes.apple.com/search";

const ENDPOINT_VAR: &str = "SONG_SEARCH_ENDPOINT";
const USER_AGENT_VAR: &str = "SONG_SEARCH_USER_AGENT";

/// Where and as whom the catalog client talks to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub endpoint: String,
    pub user_agent: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl CatalogConfig {
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Reads overrides from the environment; blank values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let endpoint = read(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let user_agent = read(USER_AGENT_VAR).unwrap_or_else(default_user_agent);

        Self {
            endpoint,
            user_agent,
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "{}/{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}
