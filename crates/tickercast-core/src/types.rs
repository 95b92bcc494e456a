//! Record types passed between pipeline stages.
//!
//! Checkpoint artifacts serialize these exact shapes, so staged and
//! monolithic runs are interchangeable at every stage boundary.

use serde::{Deserialize, Serialize};

/// Price/volume summary for one ticker over the lookback window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    /// Last close in the window.
    pub current: f64,
    /// Highest high over the last 14 candles.
    pub high_14d: f64,
    /// Lowest low over the last 14 candles.
    pub low_14d: f64,
    /// Mean volume over the whole window, when the feed reports volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_avg: Option<f64>,
    /// Up to the last 14 closes, oldest first.
    #[serde(default)]
    pub closes: Vec<f64>,
    /// Up to the last 5 trading dates (`YYYY-MM-DD`), oldest first.
    #[serde(default)]
    pub dates: Vec<String>,
}

/// Market-data slot of a gathered record: real prices, or an error marker
/// when the fetch exhausted its retries. The marker replaces the data — it
/// is never surfaced as an exception to the batch runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketData {
    Prices(PriceSummary),
    Unavailable { error: String },
}

impl MarketData {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        MarketData::Unavailable {
            error: message.into(),
        }
    }

    /// `true` when this slot carries an error marker instead of prices.
    /// Downstream stages treat such records as "no usable data" and skip
    /// generation for the ticker.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, MarketData::Unavailable { .. })
    }
}

/// Merged external-data snapshot for one ticker, keyed by ticker in the
/// gathered map. Immutable once built. Context lists may degrade to a
/// single `"Error: <message>"` marker entry when a sub-fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatheredRecord {
    pub market: MarketData,
    #[serde(default)]
    pub news: Vec<String>,
    #[serde(default, rename = "macro")]
    pub macro_context: Vec<String>,
}

/// Parsed prediction for one ticker. Produced exactly once per ticker with
/// usable market data; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Calendar date of the run, `YYYY-MM-DD`.
    pub date: String,
    pub ticker: String,
    pub predicted_change_pct: f64,
    pub reason: String,
}
