//! Condenses raw candles into the prompt-facing price summary.

use chrono::DateTime;

use tickercast_core::PriceSummary;

use crate::types::{ChartResult, QuoteBlock};

/// One trading day with all values present.
#[derive(Debug, Clone)]
pub(crate) struct Candle {
    pub date: String,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: Option<f64>,
}

const RECENT_CANDLES: usize = 14;
const RECENT_DATES: usize = 5;

/// Flattens the chart envelope's parallel arrays into candles, dropping
/// days with a missing close.
pub(crate) fn candles_from_chart(result: &ChartResult) -> Vec<Candle> {
    let quote = result.indicators.quote.first();
    let empty = QuoteBlock::default();
    let quote = quote.unwrap_or(&empty);

    result
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let close = quote.close.get(i).copied().flatten()?;
            let high = quote.high.get(i).copied().flatten().unwrap_or(close);
            let low = quote.low.get(i).copied().flatten().unwrap_or(close);
            let volume = quote.volume.get(i).copied().flatten();
            let date = DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.format("%Y-%m-%d").to_string())?;
            Some(Candle {
                date,
                close,
                high,
                low,
                volume,
            })
        })
        .collect()
}

/// Summarizes candles into the record the prompt is built from: last close,
/// 14-candle high/low, mean volume, last 14 closes, last 5 dates.
///
/// Returns `None` for an empty candle set.
pub(crate) fn summarize(candles: &[Candle]) -> Option<PriceSummary> {
    let last = candles.last()?;
    let recent_start = candles.len().saturating_sub(RECENT_CANDLES);
    let recent = &candles[recent_start..];

    let high_14d = recent.iter().map(|c| c.high).fold(f64::MIN, f64::max);
    let low_14d = recent.iter().map(|c| c.low).fold(f64::MAX, f64::min);

    let volumes: Vec<f64> = candles.iter().filter_map(|c| c.volume).collect();
    #[allow(clippy::cast_precision_loss)]
    let volume_avg = if volumes.is_empty() {
        None
    } else {
        Some(volumes.iter().sum::<f64>() / volumes.len() as f64)
    };

    let dates_start = candles.len().saturating_sub(RECENT_DATES);

    Some(PriceSummary {
        current: last.close,
        high_14d,
        low_14d,
        volume_avg,
        closes: recent.iter().map(|c| c.close).collect(),
        dates: candles[dates_start..].iter().map(|c| c.date.clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(day: u32, close: f64) -> Candle {
        Candle {
            date: format!("2026-07-{day:02}"),
            close,
            high: close + 1.0,
            low: close - 1.0,
            volume: Some(1000.0),
        }
    }

    #[test]
    fn empty_candles_summarize_to_none() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn single_candle_summary() {
        let summary = summarize(&[candle(1, 50.0)]).unwrap();
        assert_eq!(summary.current, 50.0);
        assert_eq!(summary.high_14d, 51.0);
        assert_eq!(summary.low_14d, 49.0);
        assert_eq!(summary.closes, vec![50.0]);
        assert_eq!(summary.dates, vec!["2026-07-01"]);
    }

    #[test]
    fn windows_are_truncated_to_recent_entries() {
        let candles: Vec<Candle> = (1..=20).map(|d| candle(d, f64::from(d))).collect();
        let summary = summarize(&candles).unwrap();
        assert_eq!(summary.current, 20.0);
        // High/low over the last 14 candles only: closes 7..=20.
        assert_eq!(summary.high_14d, 21.0);
        assert_eq!(summary.low_14d, 6.0);
        assert_eq!(summary.closes.len(), 14);
        assert_eq!(summary.closes[0], 7.0);
        assert_eq!(summary.dates.len(), 5);
        assert_eq!(summary.dates[0], "2026-07-16");
    }

    #[test]
    fn mean_volume_ignores_missing_entries() {
        let mut a = candle(1, 10.0);
        a.volume = Some(100.0);
        let mut b = candle(2, 11.0);
        b.volume = None;
        let mut c = candle(3, 12.0);
        c.volume = Some(300.0);
        let summary = summarize(&[a, b, c]).unwrap();
        assert_eq!(summary.volume_avg, Some(200.0));
    }
}
