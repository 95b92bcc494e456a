use thiserror::Error;

/// Configuration faults are fatal: they abort the run before any batch work
/// starts, naming the offending variable or file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0} — set it in your environment or .env file")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read watchlist file {path}: {source}")]
    WatchlistIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse watchlist file: {0}")]
    WatchlistParse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Validation(String),
}
