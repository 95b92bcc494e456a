use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Url};

use tickercast_core::PriceSummary;

use crate::error::QuoteError;
use crate::summary::{candles_from_chart, summarize};
use crate::types::ChartResponse;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// The prompt needs at least a month of context, so shorter windows are
/// widened to this floor.
const MIN_LOOKBACK_DAYS: u32 = 30;

/// Client for the public daily-candle chart endpoint.
///
/// Treat one instance as a safe-for-concurrent-use singleton: the inner
/// `reqwest::Client` is cheaply cloneable and all methods take `&self`.
/// Use [`QuoteClient::with_base_url`] to point at a mock server in tests.
pub struct QuoteClient {
    client: Client,
    base_url: Url,
}

impl QuoteClient {
    /// Creates a client pointed at the production chart endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, QuoteError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Http`] if the client cannot be constructed, or
    /// [`QuoteError::Api`] if `base_url` is not a valid URL.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| QuoteError::Api {
            ticker: String::new(),
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self { client, base_url })
    }

    /// Fetches `lookback_days` of daily history for `ticker` (widened to at
    /// least 30 days) and condenses it into a [`PriceSummary`].
    ///
    /// # Errors
    ///
    /// - [`QuoteError::NotFound`] — unknown symbol (HTTP 404).
    /// - [`QuoteError::RateLimited`] — HTTP 429.
    /// - [`QuoteError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`QuoteError::Api`] — the feed's error envelope was populated.
    /// - [`QuoteError::NoHistory`] — the window contained no usable candles.
    /// - [`QuoteError::Http`] / [`QuoteError::Deserialize`] — transport or
    ///   body-shape failures.
    pub async fn fetch_daily_history(
        &self,
        ticker: &str,
        lookback_days: u32,
    ) -> Result<PriceSummary, QuoteError> {
        let days = lookback_days.max(MIN_LOOKBACK_DAYS);
        let encoded = utf8_percent_encode(ticker, NON_ALPHANUMERIC).to_string();
        let mut url = self
            .base_url
            .join(&format!("v8/finance/chart/{encoded}"))
            .map_err(|e| QuoteError::Api {
                ticker: ticker.to_owned(),
                message: format!("invalid chart URL: {e}"),
            })?;
        url.query_pairs_mut()
            .append_pair("range", &format!("{days}d"))
            .append_pair("interval", "1d");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        match status.as_u16() {
            200..=299 => {}
            404 => {
                return Err(QuoteError::NotFound {
                    ticker: ticker.to_owned(),
                })
            }
            429 => {
                return Err(QuoteError::RateLimited {
                    ticker: ticker.to_owned(),
                })
            }
            code => {
                return Err(QuoteError::UnexpectedStatus {
                    status: code,
                    ticker: ticker.to_owned(),
                })
            }
        }

        let body = response.text().await?;
        let envelope: ChartResponse =
            serde_json::from_str(&body).map_err(|e| QuoteError::Deserialize {
                context: format!("chart({ticker})"),
                source: e,
            })?;

        if let Some(api_error) = envelope.chart.error {
            return Err(QuoteError::Api {
                ticker: ticker.to_owned(),
                message: api_error.message(),
            });
        }

        let result = envelope
            .chart
            .result
            .as_deref()
            .and_then(<[_]>::first)
            .ok_or_else(|| QuoteError::NoHistory {
                ticker: ticker.to_owned(),
            })?;

        let candles = candles_from_chart(result);
        tracing::debug!(ticker, candles = candles.len(), "fetched daily history");

        summarize(&candles).ok_or_else(|| QuoteError::NoHistory {
            ticker: ticker.to_owned(),
        })
    }
}
