use std::path::PathBuf;

use crate::ConfigError;

/// Runtime configuration assembled from `TICKERCAST_*` environment variables.
///
/// Credentials are optional at load time; each pipeline stage calls the
/// matching `require_*` accessor before starting per-item work so a missing
/// key fails fast with the variable name instead of failing once per ticker.
#[derive(Clone)]
pub struct AppConfig {
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub search_api_key: Option<String>,
    pub sheet_id: Option<String>,
    pub sheets_token: Option<String>,
    pub state_dir: PathBuf,
    pub watchlist_path: PathBuf,
    pub concurrency: usize,
    pub max_retries: u32,
    pub lookback_days: u32,
    pub top_k: usize,
    pub request_timeout_secs: u64,
    pub quotes_base_url: String,
    pub search_base_url: String,
}

impl AppConfig {
    /// Generation API key, required before the analyze stage runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `TICKERCAST_LLM_API_KEY`
    /// is not set.
    pub fn require_llm_api_key(&self) -> Result<&str, ConfigError> {
        self.llm_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TICKERCAST_LLM_API_KEY".to_owned()))
    }

    /// Search API key, required before the gather stage runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `TICKERCAST_SEARCH_API_KEY`
    /// is not set.
    pub fn require_search_api_key(&self) -> Result<&str, ConfigError> {
        self.search_api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TICKERCAST_SEARCH_API_KEY".to_owned()))
    }

    /// Sink bearer token, required before any spreadsheet write.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `TICKERCAST_SHEETS_TOKEN`
    /// is not set.
    pub fn require_sheets_token(&self) -> Result<&str, ConfigError> {
        self.sheets_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TICKERCAST_SHEETS_TOKEN".to_owned()))
    }

    /// Target spreadsheet id, required before the deliver stage runs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `TICKERCAST_SHEET_ID`
    /// is not set.
    pub fn require_sheet_id(&self) -> Result<&str, ConfigError> {
        self.sheet_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TICKERCAST_SHEET_ID".to_owned()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "[redacted]"))
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field(
                "search_api_key",
                &self.search_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("sheet_id", &self.sheet_id)
            .field(
                "sheets_token",
                &self.sheets_token.as_ref().map(|_| "[redacted]"),
            )
            .field("state_dir", &self.state_dir)
            .field("watchlist_path", &self.watchlist_path)
            .field("concurrency", &self.concurrency)
            .field("max_retries", &self.max_retries)
            .field("lookback_days", &self.lookback_days)
            .field("top_k", &self.top_k)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("quotes_base_url", &self.quotes_base_url)
            .field("search_base_url", &self.search_base_url)
            .finish()
    }
}
