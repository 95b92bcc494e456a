use thiserror::Error;

/// Errors returned by the spreadsheet client. Sink faults are not retried:
/// a ranked-write failure is the deliver stage's failure, and the optional
/// raw write is logged and swallowed by its caller.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status from the sheets API.
    #[error("unexpected HTTP status {status} during {context}")]
    UnexpectedStatus { status: u16, context: String },

    /// The response body could not be deserialized into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Client-side misuse (invalid base URL or range).
    #[error("sheets API error: {0}")]
    Api(String),
}
