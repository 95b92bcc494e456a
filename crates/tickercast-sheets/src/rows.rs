//! Fixed-order row serialization for the sink.

use tickercast_core::AnalysisRecord;

/// Header row, written/verified before any data rows. Column order is part
/// of the sink contract.
pub const HEADER: [&str; 4] = ["date", "stock ticker", "% change in stock price", "reason"];

/// Serializes one record into the fixed column order
/// `[date, ticker, predicted_change_pct, reason]`.
#[must_use]
pub fn to_row(record: &AnalysisRecord) -> Vec<String> {
    vec![
        record.date.clone(),
        record.ticker.clone(),
        record.predicted_change_pct.to_string(),
        record.reason.clone(),
    ]
}
