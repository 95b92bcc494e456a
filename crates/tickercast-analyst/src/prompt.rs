//! Prompt construction for the analysis exchange.

use tickercast_core::{GatheredRecord, MarketData};

/// Closes quoted back to the model in the price summary.
const PROMPT_CLOSES: usize = 7;

pub const ANALYST_SYSTEM: &str = "You are a stock analyst. Based on the given data, output a short prediction.\n\nRequired instruction: Based on recent news, price fluctuations, and economic macros of this stock, predict what percentage the price will change in exactly one week and provide a short explanation of the reason.\n\nRespond in JSON only, with exactly these keys:\n- \"predicted_change_pct\": a number (e.g. 2.5 for +2.5%, -1.2 for -1.2%)\n- \"reason\": short explanation in one or two sentences.";

/// Builds the user half of the exchange from the gathered record.
#[must_use]
pub fn build_user_prompt(ticker: &str, record: &GatheredRecord) -> String {
    format!(
        "Ticker: {ticker}\n\nPrice/data summary:\n{}\n\nNews and macro:\n{}\n\nOutput JSON only (predicted_change_pct, reason).",
        format_price_summary(&record.market),
        format_context(record),
    )
}

/// Renders the market-data slot for the prompt. Error markers render as the
/// no-data sentence so the model never sees raw failure text.
#[must_use]
pub fn format_price_summary(market: &MarketData) -> String {
    let MarketData::Prices(prices) = market else {
        return "No price data available.".to_owned();
    };

    let mut parts = vec![
        format!("Current: {}", prices.current),
        format!("14d high: {}", prices.high_14d),
        format!("14d low: {}", prices.low_14d),
    ];
    if !prices.closes.is_empty() {
        let start = prices.closes.len().saturating_sub(PROMPT_CLOSES);
        let closes: Vec<String> = prices.closes[start..].iter().map(ToString::to_string).collect();
        parts.push(format!("Recent closes: [{}]", closes.join(", ")));
    }
    parts.join("\n")
}

/// Renders the context lists for the prompt: `"No news or macro data."` when
/// both are empty.
#[must_use]
pub fn format_context(record: &GatheredRecord) -> String {
    let mut lines = Vec::new();
    if !record.news.is_empty() {
        lines.push(format!("News: {}", record.news.join(" | ")));
    }
    if !record.macro_context.is_empty() {
        lines.push(format!("Macro: {}", record.macro_context.join(" | ")));
    }
    if lines.is_empty() {
        "No news or macro data.".to_owned()
    } else {
        lines.join("\n")
    }
}
