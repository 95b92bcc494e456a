use thiserror::Error;

use tickercast_core::retry::Transient;

/// Errors returned by the chat-completions client.
#[derive(Debug, Error)]
pub enum AnalystError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status without a parseable error body.
    #[error("unexpected HTTP status {status} from generation API")]
    UnexpectedStatus { status: u16 },

    /// The generation API rejected the request (bad key, unknown model, …).
    #[error("generation API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A 2xx response that carried no choices at all.
    #[error("generation API returned no choices")]
    NoChoices,
}

impl Transient for AnalystError {
    fn is_transient(&self) -> bool {
        match self {
            AnalystError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            AnalystError::UnexpectedStatus { status } => {
                *status == 429 || (500..=599).contains(status)
            }
            AnalystError::Api(_) | AnalystError::Deserialize { .. } | AnalystError::NoChoices => {
                false
            }
        }
    }
}
