use thiserror::Error;

use tickercast_core::retry::Transient;

/// Errors returned by the chart API client.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 404 — unknown symbol; retrying would return the same result.
    #[error("symbol not found: {ticker}")]
    NotFound { ticker: String },

    /// HTTP 429 — the feed has asked us to back off.
    #[error("rate limited fetching {ticker}")]
    RateLimited { ticker: String },

    /// Any other non-2xx status.
    #[error("unexpected HTTP status {status} fetching {ticker}")]
    UnexpectedStatus { status: u16, ticker: String },

    /// The feed answered 200 with an application-level error envelope.
    #[error("chart API error for {ticker}: {message}")]
    Api { ticker: String, message: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The feed returned an empty candle set for the requested window.
    #[error("no price history for {ticker}")]
    NoHistory { ticker: String },
}

impl Transient for QuoteError {
    fn is_transient(&self) -> bool {
        match self {
            QuoteError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            QuoteError::RateLimited { .. } => true,
            QuoteError::UnexpectedStatus { status, .. } => (500..=599).contains(status),
            QuoteError::NotFound { .. }
            | QuoteError::Api { .. }
            | QuoteError::Deserialize { .. }
            | QuoteError::NoHistory { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_is_transient() {
        assert!(QuoteError::RateLimited {
            ticker: "AAPL".into()
        }
        .is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        assert!(QuoteError::UnexpectedStatus {
            status: 503,
            ticker: "AAPL".into()
        }
        .is_transient());
    }

    #[test]
    fn not_found_is_not_transient() {
        assert!(!QuoteError::NotFound {
            ticker: "AAPL".into()
        }
        .is_transient());
    }

    #[test]
    fn no_history_is_not_transient() {
        assert!(!QuoteError::NoHistory {
            ticker: "AAPL".into()
        }
        .is_transient());
    }

    #[test]
    fn deserialize_is_not_transient() {
        let source = serde_json::from_str::<()>("nope").unwrap_err();
        assert!(!QuoteError::Deserialize {
            context: "test".into(),
            source,
        }
        .is_transient());
    }
}
