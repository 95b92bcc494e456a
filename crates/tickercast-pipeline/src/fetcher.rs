//! Per-ticker data gathering with partial-failure tolerance.

use tickercast_core::retry::retry_with_backoff;
use tickercast_core::{GatheredRecord, MarketData};
use tickercast_quotes::QuoteClient;
use tickercast_search::SearchClient;

/// Fetches market data and news/macro context for one ticker and merges
/// them into a [`GatheredRecord`].
///
/// Infallible by design: each of the three sub-fetches is independently
/// wrapped in the retry policy, and exhaustion degrades into the record
/// itself — an error marker in the market slot, or a single
/// `"Error: <message>"` entry in the affected context list. Expected and
/// transient faults never escape to the batch runner.
pub async fn gather_one(
    quotes: &QuoteClient,
    search: &SearchClient,
    ticker: &str,
    lookback_days: u32,
    max_retries: u32,
) -> GatheredRecord {
    let market = match retry_with_backoff(max_retries, || {
        quotes.fetch_daily_history(ticker, lookback_days)
    })
    .await
    {
        Ok(prices) => MarketData::Prices(prices),
        Err(e) => {
            tracing::warn!(ticker, error = %e, "market data unavailable after retries");
            MarketData::unavailable(e.to_string())
        }
    };

    let news = match retry_with_backoff(max_retries, || search.ticker_news(ticker)).await {
        Ok(snippets) => snippets,
        Err(e) => {
            tracing::warn!(ticker, error = %e, "news search failed after retries");
            vec![format!("Error: {e}")]
        }
    };

    let macro_context = match retry_with_backoff(max_retries, || search.macro_context()).await {
        Ok(snippets) => snippets,
        Err(e) => {
            tracing::warn!(ticker, error = %e, "macro search failed after retries");
            vec![format!("Error: {e}")]
        }
    };

    if news.is_empty() && macro_context.is_empty() {
        tracing::warn!(ticker, "no news or macro context retrieved");
    }

    GatheredRecord {
        market,
        news,
        macro_context,
    }
}
