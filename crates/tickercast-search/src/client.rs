use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::SearchError;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com";

const MAX_NEWS_SNIPPETS: usize = 5;
const MAX_MACRO_SNIPPETS: usize = 3;

/// Client for the snippet-search API.
///
/// Safe-for-concurrent-use singleton; constructed once in the CLI and
/// passed by reference into the gather stage. Use
/// [`SearchClient::with_base_url`] to point at a mock server in tests.
pub struct SearchClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_answer: bool,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<SearchResult>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(default)]
    content: Option<String>,
}

impl SearchClient {
    /// Creates a client pointed at the production search API.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, SearchError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Http`] if the client cannot be constructed, or
    /// [`SearchError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| SearchError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Recent ticker-specific news: up to 5 snippets, synthesized answer
    /// first when the API provides one.
    ///
    /// # Errors
    ///
    /// Propagates [`SearchError`] so the item fetcher can retry and then
    /// degrade to a marker list.
    pub async fn ticker_news(&self, ticker: &str) -> Result<Vec<String>, SearchError> {
        let query = format!("latest news {ticker} stock earnings revenue");
        let snippets = self.search(&query, MAX_NEWS_SNIPPETS).await?;
        if snippets.is_empty() {
            tracing::warn!(ticker, "search returned no news snippets");
        }
        Ok(snippets)
    }

    /// Macro/economic background: up to 3 snippets, shared by every ticker
    /// in a batch.
    ///
    /// # Errors
    ///
    /// Propagates [`SearchError`] so the item fetcher can retry and then
    /// degrade to a marker list.
    pub async fn macro_context(&self) -> Result<Vec<String>, SearchError> {
        let query = "US economic macro data inflation Fed interest rates latest";
        let snippets = self.search(query, MAX_MACRO_SNIPPETS).await?;
        if snippets.is_empty() {
            tracing::warn!("search returned no macro snippets");
        }
        Ok(snippets)
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, SearchError> {
        let url = self
            .base_url
            .join("search")
            .map_err(|e| SearchError::Api(format!("invalid search URL: {e}")))?;

        let request = SearchRequest {
            api_key: &self.api_key,
            query,
            max_results,
            search_depth: "advanced",
            include_answer: true,
        };

        let response = self.client.post(url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| SearchError::Deserialize {
                context: format!("search(\"{query}\")"),
                source: e,
            })?;

        if let Some(error) = parsed.error {
            return Err(SearchError::Api(error));
        }

        let mut snippets: Vec<String> = Vec::new();
        if let Some(answer) = parsed.answer {
            if !answer.trim().is_empty() {
                snippets.push(answer);
            }
        }
        snippets.extend(
            parsed
                .results
                .into_iter()
                .filter_map(|r| r.content)
                .filter(|c| !c.trim().is_empty()),
        );
        snippets.truncate(max_results);
        Ok(snippets)
    }
}
