//! Top-K selection over analysis records.

use tickercast_core::AnalysisRecord;

/// Filters to strictly positive predictions, stable-sorts descending by
/// `predicted_change_pct`, and keeps the top `k`.
///
/// Pure apart from an informational count line. Fewer than `k` qualifying
/// records — including zero — is valid output, not an error.
#[must_use]
pub fn rank_top_k(records: &[AnalysisRecord], k: usize) -> Vec<AnalysisRecord> {
    let mut positive: Vec<AnalysisRecord> = records
        .iter()
        .filter(|r| r.predicted_change_pct > 0.0)
        .cloned()
        .collect();
    positive.sort_by(|a, b| {
        b.predicted_change_pct
            .partial_cmp(&a.predicted_change_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    positive.truncate(k);

    tracing::info!(selected = positive.len(), k, "ranked positive predictions");
    println!("  ranked {} positive predictions (top {k} kept).", positive.len());
    positive
}
