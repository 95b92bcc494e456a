use thiserror::Error;

use tickercast_core::retry::Transient;

/// Errors returned by the search API client.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from the search API.
    #[error("unexpected HTTP status {status} from search API")]
    UnexpectedStatus { status: u16 },

    /// Application-level failure (bad key, rejected query).
    #[error("search API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Transient for SearchError {
    fn is_transient(&self) -> bool {
        match self {
            SearchError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            SearchError::UnexpectedStatus { status } => *status == 429 || (500..=599).contains(status),
            SearchError::Api(_) | SearchError::Deserialize { .. } => false,
        }
    }
}
