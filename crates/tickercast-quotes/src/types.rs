//! Wire types for the chart endpoint envelope.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartApiError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartApiError {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ChartApiError {
    pub fn message(&self) -> String {
        match (&self.code, &self.description) {
            (Some(code), Some(desc)) => format!("{code}: {desc}"),
            (Some(code), None) => code.clone(),
            (None, Some(desc)) => desc.clone(),
            (None, None) => "unknown chart error".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResult {
    /// Unix timestamps, one per candle. Absent when the symbol has no data.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
}

/// Parallel arrays aligned with `timestamp`. Entries are `null` on days the
/// feed has no value (halts, holidays), so every slot is optional.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuoteBlock {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}
